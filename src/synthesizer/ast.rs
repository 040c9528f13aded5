#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    /// Anonymous tuple. `suffix` is whatever followed the closing paren of
    /// the type, e.g. `[]` for an array of tuples.
    Tuple {
        fields: Vec<EventParameter>,
        suffix: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParameter {
    pub name: String,
    pub raw_type: String,
    pub indexed: bool,
    pub kind: ParamKind,
}

impl EventParameter {
    pub fn tuple_fields(&self) -> Option<&[EventParameter]> {
        match &self.kind {
            ParamKind::Tuple { fields, .. } => Some(fields),
            ParamKind::Scalar => None,
        }
    }

    /// Arrays, dynamic primitives and structs need a data location when
    /// taken by an external function.
    pub fn is_reference(&self) -> bool {
        match &self.kind {
            ParamKind::Tuple { .. } => true,
            ParamKind::Scalar => {
                self.raw_type.ends_with(']') || matches!(self.raw_type.as_str(), "string" | "bytes")
            }
        }
    }

    /// ABI-style type with field names and whitespace removed.
    pub fn canonical_type(&self) -> String {
        match &self.kind {
            ParamKind::Scalar => self.raw_type.clone(),
            ParamKind::Tuple { fields, suffix } => {
                let inner: Vec<String> = fields.iter().map(|f| f.canonical_type()).collect();
                format!("({}){}", inner.join(","), suffix)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventModel {
    pub name: String,
    pub parameters: Vec<EventParameter>,
}

impl EventModel {
    /// Name of the generated function that emits this event.
    pub fn emitter_name(&self) -> String {
        format!("emit{}", capitalize(&self.name))
    }

    pub fn canonical_signature(&self) -> String {
        let types: Vec<String> = self.parameters.iter().map(|p| p.canonical_type()).collect();
        format!("{}({})", self.name, types.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractKind {
    DataSource { address: Option<String> },
    Template,
}

impl ContractKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContractKind::DataSource { .. } => "data source",
            ContractKind::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractModel {
    pub name: String,
    pub kind: ContractKind,
    pub events: Vec<EventModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    /// Field type with nested tuples replaced by their struct names.
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDeclaration {
    pub name: String,
    pub fields: Vec<StructField>,
    /// Index of the declaring event within its contract.
    pub event_index: usize,
    /// Parameter positions from the event's parameter list down to this tuple.
    pub path: Vec<usize>,
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
