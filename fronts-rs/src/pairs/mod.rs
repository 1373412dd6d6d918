pub mod label_pair;
pub mod pair_i_metric;
pub mod pair_output;
pub mod sort_ranks;
