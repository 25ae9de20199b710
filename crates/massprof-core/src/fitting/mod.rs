pub mod statistic;

pub use statistic::{
    ChiSquare, DEFAULT_REPORT_EVERY, EvaluationEvent, FitObserver, INFEASIBLE_STATISTIC,
    ObservedProfile, TracingObserver, reduced_chi_square,
};
