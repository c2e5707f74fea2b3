//! Procedural macros for Tessera.
//!
//! - `#[component(element = "...")]` - register a component factory

use proc_macro::TokenStream;

mod component;

/// Register a function as the factory of a component module.
///
/// The function takes the resolved [`Props`] and returns anything that
/// implements `Component`. The macro replaces it with a unit struct of the
/// same name implementing `ComponentFactory`, and submits the struct to the
/// global registry collected by `InventorySource`.
///
/// # Usage
///
/// ```rust,ignore
/// #[tessera::component(element = "hui-gauge-card")]
/// fn gauge(props: Props) -> GaugeCard {
///     GaugeCard::new(props)
/// }
///
/// assert_eq!(gauge::ELEMENT, "hui-gauge-card");
/// let source = InventorySource::collect();
/// ```
///
/// [`Props`]: https://docs.rs/tessera/latest/tessera/struct.Props.html
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    component::component_impl(attr, item)
}
