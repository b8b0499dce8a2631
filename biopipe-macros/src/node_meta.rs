use darling::{FromAttributes, FromField};
use syn::{DeriveInput, Fields};

/// Parsed attributes from #[node_meta(...)]
#[derive(Debug, FromAttributes)]
#[darling(attributes(node_meta))]
pub struct NodeMetaArgs {
    pub name: String,
    pub module: String,

    #[darling(default)]
    pub category: Option<String>,
}

/// Parse inputs/outputs from #[input(...)] and #[output(...)]
#[derive(Debug, FromField)]
#[darling(attributes(input, output))]
pub struct PortField {
    pub ident: Option<syn::Ident>,

    #[darling(default)]
    pub name: Option<String>,

    #[darling(default)]
    pub data_type: Option<String>,
}

impl PortField {
    /// Port name: explicit `name`, else the field name without leading underscores
    pub fn port_name(&self) -> String {
        match (&self.name, &self.ident) {
            (Some(name), _) => name.clone(),
            (None, Some(ident)) => ident.to_string().trim_start_matches('_').to_string(),
            (None, None) => String::from("main"),
        }
    }

    /// `FrameKind` variant named by `data_type`
    pub fn frame_kind(&self) -> syn::Result<syn::Ident> {
        let span = self
            .ident
            .as_ref()
            .map(|ident| ident.span())
            .unwrap_or_else(proc_macro2::Span::call_site);
        let variant = match self.data_type.as_deref().unwrap_or("any") {
            "samples" => "Samples",
            "epochs" => "Epochs",
            "any" => "Any",
            other => {
                return Err(syn::Error::new(
                    span,
                    format!("unknown data_type `{}`, expected samples, epochs or any", other),
                ))
            }
        };
        Ok(syn::Ident::new(variant, span))
    }
}

pub fn parse_node_info(input: &DeriveInput) -> darling::Result<NodeMetaArgs> {
    NodeMetaArgs::from_attributes(&input.attrs)
}

pub fn parse_ports(input: &DeriveInput) -> darling::Result<(Vec<PortField>, Vec<PortField>)> {
    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Ok((Vec::new(), Vec::new())),
        },
        _ => {
            return Err(darling::Error::custom("PipelineNode can only be derived for structs")
                .with_span(&input.ident))
        }
    };

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for field in fields.iter() {
        // Check for #[input] attribute
        if field.attrs.iter().any(|attr| attr.path().is_ident("input")) {
            inputs.push(PortField::from_field(field)?);
        }

        // Check for #[output] attribute
        if field.attrs.iter().any(|attr| attr.path().is_ident("output")) {
            outputs.push(PortField::from_field(field)?);
        }
    }

    Ok((inputs, outputs))
}
