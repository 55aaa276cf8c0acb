use crate::grammar::scale::Scale;

/// A named attribute plus an optional value scale.
#[derive(Clone, Debug)]
pub struct AttributeRef {
    /// Attribute name on the data frame.
    pub name: String,
    /// Scale applied to the attribute values, identity when `None`.
    pub scale: Option<Scale>,
}

impl AttributeRef {
    /// Unscaled reference to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: None,
        }
    }

    /// Append `scale` after any scale already attached.
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(match self.scale.take() {
            Some(existing) => existing * scale,
            None => scale,
        });
        self
    }
}

impl From<&str> for AttributeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AttributeRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
