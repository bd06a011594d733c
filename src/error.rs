pub type GridwallResult<T> = Result<T, GridwallError>;

#[derive(thiserror::Error, Debug)]
pub enum GridwallError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridwallError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GridwallError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GridwallError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GridwallError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
