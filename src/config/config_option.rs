use crate::context::ContextState;

/// A configurable value, with bounds and the latest state of a context at which the value may be changed.
#[derive(Clone)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub max_state: ContextState,
    pub value: T,
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, if the value is within bounds and the state permits.
    ///
    /// Returns true if the value was set.
    pub fn set(&mut self, value: T, state: ContextState) -> bool {
        if value < self.min || value > self.max || state > self.max_state {
            return false;
        }
        self.value = value;
        true
    }
}
