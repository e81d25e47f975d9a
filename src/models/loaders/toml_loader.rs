use crate::error::{AppResult, FileError};
use crate::models::ParameterSpace;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载参数空间
///
/// 文件格式：
///
/// ```toml
/// subjects = ["mathematics", "physics"]
/// year_start = 2000
/// year_end = 2019
/// exam_types = ["utme", "wassce"]
/// ```
pub async fn load_parameter_space(toml_file_path: &Path) -> AppResult<ParameterSpace> {
    let path = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.clone(),
            source,
        })?;

    let space: ParameterSpace =
        toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: path.clone(),
            source,
        })?;

    space.validate()?;

    tracing::info!(
        "已从 {} 加载参数空间: {} 个科目, {}-{} 年, {} 种考试类型",
        path,
        space.subjects.len(),
        space.year_start,
        space.year_end,
        space.exam_types.len()
    );

    Ok(space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ConfigError};
    use crate::models::{ExamType, Subject};
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_parameter_space() {
        let file = write_temp(
            r#"
            subjects = ["mathematics", "christian-religious-studies"]
            year_start = 2010
            year_end = 2012
            exam_types = ["post-utme"]
            "#,
        );

        let space = load_parameter_space(file.path()).await.unwrap();

        assert_eq!(
            space.subjects,
            vec![Subject::Mathematics, Subject::ChristianReligiousStudies]
        );
        assert_eq!(space.exam_types, vec![ExamType::PostUtme]);
        assert_eq!(space.len(), 2 * 3);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_parse_error() {
        let file = write_temp(
            r#"
            subjects = ["astrology"]
            year_start = 2010
            year_end = 2012
            exam_types = ["utme"]
            "#,
        );

        let err = load_parameter_space(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::TomlParseFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_inverted_years_rejected() {
        let file = write_temp(
            r#"
            subjects = ["english"]
            year_start = 2015
            year_end = 2012
            exam_types = ["utme"]
            "#,
        );

        let err = load_parameter_space(file.path()).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_duplicate_entries_rejected() {
        let file = write_temp(
            r#"
            subjects = ["mathematics", "mathematics"]
            year_start = 2005
            year_end = 2005
            exam_types = ["utme", "utme"]
            "#,
        );

        let err = load_parameter_space(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidParameterSpace(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_parameter_space(Path::new("/nonexistent/space.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
