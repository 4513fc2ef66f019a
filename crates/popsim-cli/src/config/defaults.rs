use stdpopsim::engine::simulator::DEFAULT_PROGRAM;

/// Built-in values used when neither the command line nor the config file sets them.
pub struct DefaultsConfig {
    pub length_multiplier: f64,
    pub simulator_program: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            length_multiplier: 1.0,
            simulator_program: DEFAULT_PROGRAM.to_string(),
        }
    }
}
