//! The replica contract shared by every synced object.

use quassel_proto::{FieldMap, TypeTag};

/// Last-known property values of a replica.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    pub(crate) fields: FieldMap,
    pub(crate) initialized: bool,
}

impl Properties {
    /// Properties of an object that needs no init response.
    pub(crate) fn initialized() -> Self {
        Self {
            fields: FieldMap::new(),
            initialized: true,
        }
    }

    /// Field-wise last-write-wins merge.
    pub(crate) fn merge(&mut self, fields: &FieldMap) {
        for (key, value) in fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// A local replica of a core-owned object.
///
/// Implementors only provide identity and storage; `init` and `apply` merge
/// the incoming fields and then call [`Syncable::refresh`] so typed views can
/// be rebuilt from what changed.
pub trait Syncable {
    fn type_tag(&self) -> TypeTag;

    /// Name under which the registry files this object.
    fn object_name(&self) -> String;

    fn state(&self) -> &Properties;

    fn state_mut(&mut self) -> &mut Properties;

    /// Rebuild typed views after `changed` was merged.
    fn refresh(&mut self, _changed: &FieldMap) {}

    fn properties(&self) -> &FieldMap {
        &self.state().fields
    }

    fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    /// Populate from an init response.
    fn init(&mut self, fields: FieldMap) {
        let state = self.state_mut();
        state.merge(&fields);
        state.initialized = true;
        self.refresh(&fields);
    }

    /// Apply an incremental mutation.
    fn apply(&mut self, fields: FieldMap) {
        self.state_mut().merge(&fields);
        self.refresh(&fields);
    }
}

/// Implements the storage half of [`Syncable`] for a struct with a
/// `state: Properties` field.
macro_rules! impl_syncable {
    ($ty:ty, $tag:expr, |$this:ident| $name:expr $(, refresh = $refresh:path)?) => {
        impl $crate::model::Syncable for $ty {
            fn type_tag(&self) -> quassel_proto::TypeTag {
                $tag
            }

            fn object_name(&self) -> String {
                let $this = self;
                $name
            }

            fn state(&self) -> &$crate::model::Properties {
                &self.state
            }

            fn state_mut(&mut self) -> &mut $crate::model::Properties {
                &mut self.state
            }

            $(
                fn refresh(&mut self, changed: &quassel_proto::FieldMap) {
                    $refresh(self, changed)
                }
            )?
        }
    };
}

pub(crate) use impl_syncable;

#[cfg(test)]
mod tests {
    use super::*;
    use quassel_proto::Value;

    #[derive(Default)]
    struct Recorder {
        state: Properties,
        refreshed: usize,
    }

    impl Recorder {
        fn on_refresh(&mut self, _changed: &FieldMap) {
            self.refreshed += 1;
        }
    }

    impl_syncable!(Recorder, TypeTag::CoreInfo, |_p| String::new(), refresh = Recorder::on_refresh);

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn init_marks_initialized_and_refreshes() {
        let mut recorder = Recorder::default();
        assert!(!recorder.is_initialized());
        recorder.init(fields(&[("a", Value::Int(1))]));
        assert!(recorder.is_initialized());
        assert_eq!(recorder.refreshed, 1);
    }

    #[test]
    fn apply_is_field_wise_last_write_wins() {
        let mut recorder = Recorder::default();
        recorder.init(fields(&[("a", Value::Int(1)), ("b", Value::Int(2))]));
        recorder.apply(fields(&[("b", Value::Int(3))]));
        assert_eq!(recorder.properties().get("a"), Some(&Value::Int(1)));
        assert_eq!(recorder.properties().get("b"), Some(&Value::Int(3)));
        assert_eq!(recorder.refreshed, 2);
    }

    #[test]
    fn apply_does_not_initialize() {
        let mut recorder = Recorder::default();
        recorder.apply(fields(&[("a", Value::Null)]));
        assert!(!recorder.is_initialized());
    }
}
