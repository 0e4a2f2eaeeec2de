pub mod alpha_shape;
