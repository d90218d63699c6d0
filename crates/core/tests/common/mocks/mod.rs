/// Mock of the external hardware simulator.
pub mod simulator;
