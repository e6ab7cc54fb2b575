mod log_softmax;

pub use log_softmax::LogSoftmax;
