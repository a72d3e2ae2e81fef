pub mod scenario_gen;
