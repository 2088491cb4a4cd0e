//! gridcalc_engine - Positions, values and the formula engine.

pub mod engine;
