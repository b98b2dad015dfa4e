pub mod buffer;
pub mod dataframe;
pub mod node;

pub use buffer::SampleBuffer;
pub use dataframe::DataFrame;
pub use node::ProcessingNode;
