//! Boilerplate shared by layer implementations.

/// Implements the property accessors of `LayerTrait` against a
/// `LayerProperties` field:
/// - id(), name(), layer_type()
/// - z_index()
/// - as_any()
///
/// Usage, inside an `impl LayerTrait for MyLayer` block:
/// ```ignore
/// geopick::impl_layer_trait!(MyLayer, properties);
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer_type:ty, $properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$properties_field.layer_type
        }

        fn z_index(&self) -> i32 {
            self.$properties_field.z_index
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    };
}
