mod gradient_descent;
mod gradient_descent_with_momentum;
mod optimizer;
mod sgd;

pub use gradient_descent::GradientDescent;
pub use gradient_descent_with_momentum::GradientDescentWithMomentum;
pub use optimizer::Optimizer;
pub use sgd::Sgd;
