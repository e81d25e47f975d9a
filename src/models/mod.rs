pub mod exam_type;
pub mod loaders;
pub mod parameter_space;
pub mod question;
pub mod subject;

pub use exam_type::ExamType;
pub use loaders::load_parameter_space;
pub use parameter_space::{Combination, ParameterSpace, Position};
pub use question::{NaturalKey, RawQuestion, TaggedQuestion};
pub use subject::Subject;
