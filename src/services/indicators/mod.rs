pub mod calculator;
pub mod error;
pub mod macd;
pub mod params;
pub mod rsi;
pub mod scheduler;
pub mod series;
pub mod status;
pub mod synchronizer;
