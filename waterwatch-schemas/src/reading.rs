use crate::parameter::Parameter;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The reading slots of one session: one optional value per [`Parameter`].
///
/// All five slots always exist; an absent value means the reading was not
/// provided or could not be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    values: [Option<f64>; 5],
}

impl Readings {
    /// All five slots absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values[parameter.index()]
    }

    pub fn set(&mut self, parameter: Parameter, value: Option<f64>) {
        self.values[parameter.index()] = value;
    }

    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, Some(value));
        self
    }

    /// Iterates the slots in [`Parameter::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, Option<f64>)> + '_ {
        Parameter::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Parameter::ALL.len()))?;
        for (parameter, value) in self.iter() {
            map.serialize_entry(parameter.name(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_every_slot_absent() {
        let readings = Readings::empty();
        assert_eq!(readings.iter().count(), 5);
        assert!(readings.iter().all(|(_, v)| v.is_none()));
        assert!(readings.is_empty());
    }

    #[test]
    fn set_overwrites_single_slot() {
        let mut readings = Readings::empty().with(Parameter::Turbidity, 3.0);
        readings.set(Parameter::Turbidity, Some(4.5));
        assert_eq!(readings.get(Parameter::Turbidity), Some(4.5));
        assert_eq!(readings.present_count(), 1);

        readings.set(Parameter::Turbidity, None);
        assert!(readings.is_empty());
    }

    #[test]
    fn serializes_every_slot_by_name() {
        let readings = Readings::empty().with(Parameter::Ph, 7.2);
        let json = serde_json::to_value(readings).unwrap();
        assert_eq!(json["pH"], 7.2);
        assert!(json["Conductivity"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
