/// Sampling settings forwarded with every model request.
///
/// ```rust
/// use pcommon::GenerationOptions;
///
/// let options = GenerationOptions::streaming().with_max_tokens(256);
/// assert_eq!(options.max_tokens, Some(256));
/// assert_eq!(options.temperature, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

impl GenerationOptions {
    /// Backend defaults with incremental delivery switched on.
    pub fn streaming() -> Self {
        Self::default().enable_streaming()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn enable_streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}
