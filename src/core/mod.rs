pub mod binary;
pub mod categorical;
pub mod color;
pub mod continuous;
pub mod dispatch;
pub mod genome;
pub mod hierarchy;
pub mod scale;
pub mod value;

pub use binary::BinaryScale;
pub use categorical::CategoricalScale;
pub use color::{Color, ColorScale, UNKNOWN_COLOR};
pub use continuous::ContinuousScale;
pub use dispatch::UpdateDispatcher;
pub use genome::GenomeScale;
pub use hierarchy::HierarchyNode;
pub use scale::{DomainInput, Scale, ScaleCore};
pub use value::{DomainValue, UNKNOWN_LABEL};
