use super::errors::{ProfileError, ProfileResult};

/// Bound used for parameters that are effectively unconstrained.
pub const UNBOUNDED: f64 = 1.0e99;

#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ParamInfo {
    pub const fn new(name: &'static str, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            name,
            value,
            lower,
            upper,
        }
    }

    pub const fn unbounded(name: &'static str, value: f64) -> Self {
        Self::new(name, value, -UNBOUNDED, UNBOUNDED)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Named parameter list with current values and bounds.
///
/// Models and the projector read a flat `&[f64]` whose layout matches the
/// declared `ParamInfo` order; this type owns that layout for drivers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    infos: Vec<ParamInfo>,
}

impl ParameterSet {
    pub fn new(infos: Vec<ParamInfo>) -> Self {
        Self { infos }
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn infos(&self) -> &[ParamInfo] {
        &self.infos
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.infos.iter().map(|info| info.name).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.infos.iter().position(|info| info.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamInfo> {
        self.infos.iter().find(|info| info.name == name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|info| info.value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.infos.iter().map(|info| info.value).collect()
    }

    pub fn set_value(&mut self, name: &str, value: f64) -> ProfileResult<()> {
        let info = self.info_mut(name)?;
        info.value = value;
        Ok(())
    }

    /// Sets both bounds, ordering them so that `lower <= upper`.
    pub fn set_bounds(&mut self, name: &str, bound_a: f64, bound_b: f64) -> ProfileResult<()> {
        let info = self.info_mut(name)?;
        info.lower = bound_a.min(bound_b);
        info.upper = bound_a.max(bound_b);
        Ok(())
    }

    pub fn within_bounds(&self, values: &[f64]) -> bool {
        values.len() == self.infos.len()
            && self
                .infos
                .iter()
                .zip(values)
                .all(|(info, value)| info.contains(*value))
    }

    fn info_mut(&mut self, name: &str) -> ProfileResult<&mut ParamInfo> {
        let known = self.names().join(", ");
        self.infos
            .iter_mut()
            .find(|info| info.name == name)
            .ok_or_else(|| {
                ProfileError::input_validation(
                    "INPUT.UNKNOWN_PARAMETER",
                    format!("unknown parameter '{name}'; expected one of: {known}"),
                )
            })
    }
}
