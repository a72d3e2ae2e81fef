pub mod breakdown;
pub mod calculator;
pub mod combined;
pub mod report;
