pub mod convolve_gradient;
pub mod differentiate;
