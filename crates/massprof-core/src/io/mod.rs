pub mod tables;

pub use tables::{
    MIN_SIGNAL_TO_NOISE, assemble_observed_profile, cut_low_signal, parse_columns,
    read_brightness_table, read_columns, read_pair_table, read_radius_table, read_spline_table,
};
