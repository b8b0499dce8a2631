use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod node_meta;
use node_meta::{parse_node_info, parse_ports, PortField};

/// Derives `NodeDescriptor` and registers the node type with the registry.
///
/// ```ignore
/// #[derive(PipelineNode)]
/// #[node_meta(name = "Interpolate", module = "node.processing.interpolate", category = "Processing")]
/// pub struct Interpolate {
///     #[input(name = "main", data_type = "samples")]
///     _main_in: (),
///     #[output(name = "main", data_type = "samples")]
///     _main_out: (),
///     config: InterpolateConfig,
/// }
/// ```
#[proc_macro_derive(PipelineNode, attributes(node_meta, input, output))]
pub fn derive_pipeline_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let node_info = match parse_node_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let (inputs, outputs) = match parse_ports(&input) {
        Ok(ports) => ports,
        Err(e) => return e.write_errors().into(),
    };

    let input_specs = match port_specs(&inputs) {
        Ok(specs) => specs,
        Err(e) => return e.to_compile_error().into(),
    };
    let output_specs = match port_specs(&outputs) {
        Ok(specs) => specs,
        Err(e) => return e.to_compile_error().into(),
    };

    let struct_name = &input.ident;
    let type_name = &node_info.name;
    let module = &node_info.module;
    let category = node_info.category.as_deref().unwrap_or("Processing");

    let mod_name = syn::Ident::new(
        &format!("__node_registration_{}", struct_name.to_string().to_lowercase()),
        struct_name.span(),
    );

    let factory_fn_name = syn::Ident::new(
        &format!("create_metadata_{}", struct_name.to_string().to_lowercase()),
        struct_name.span(),
    );

    let expanded = quote! {
        impl crate::core::NodeDescriptor for #struct_name {
            const TYPE_NAME: &'static str = #type_name;
            const MODULE: &'static str = #module;
            const CATEGORY: &'static str = #category;
            const INPUTS: &'static [crate::core::PortSpec] = &[#(#input_specs),*];
            const OUTPUTS: &'static [crate::core::PortSpec] = &[#(#output_specs),*];
        }

        #[doc(hidden)]
        mod #mod_name {
            use super::*;

            fn #factory_fn_name() -> crate::registry::NodeMetadata {
                crate::registry::NodeMetadata::of::<#struct_name>()
            }

            ::inventory::submit! {
                crate::registry::NodeMetadataFactoryWrapper(#factory_fn_name)
            }
        }
    };

    TokenStream::from(expanded)
}

fn port_specs(ports: &[PortField]) -> syn::Result<Vec<proc_macro2::TokenStream>> {
    ports
        .iter()
        .map(|port| {
            let name = port.port_name();
            let kind = port.frame_kind()?;
            Ok(quote! {
                crate::core::PortSpec::new(#name, crate::core::FrameKind::#kind)
            })
        })
        .collect()
}
