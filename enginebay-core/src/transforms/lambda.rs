//! Caller-supplied unary function as a transform

use alloc::boxed::Box;

use super::Transform;

/// Wraps `FnMut(I) -> O`
///
/// ```rust
/// use enginebay_core::{LambdaTransform, Transform};
///
/// let mut bilge = LambdaTransform::new("bilge text", |wet: bool| {
///     String::from(if wet { "Water in bilge" } else { "Bilge clear" })
/// });
/// assert_eq!(bilge.apply(true).as_deref(), Some("Water in bilge"));
/// ```
pub struct LambdaTransform<I, O> {
    name: &'static str,
    function: Box<dyn FnMut(I) -> O>,
}

impl<I, O> LambdaTransform<I, O> {
    /// Named transform around `function`
    pub fn new(name: &'static str, function: impl FnMut(I) -> O + 'static) -> Self {
        Self { name, function: Box::new(function) }
    }
}

impl<I, O: Clone + 'static> Transform for LambdaTransform<I, O> {
    type Input = I;
    type Output = O;

    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&mut self, input: I) -> Option<O> {
        Some((self.function)(input))
    }
}
