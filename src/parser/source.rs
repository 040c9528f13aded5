use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

#[derive(Parser)]
#[grammar = "parser/solidity.pest"]
pub struct SoliditySourceParser;

#[derive(Debug, Default)]
pub struct ParsedSource {
    pub contract_name: String,
    pub structs: Vec<ParsedStruct>,
    pub events: Vec<ParsedEvent>,
    pub functions: Vec<ParsedFunction>,
}

#[derive(Debug)]
pub struct ParsedStruct {
    pub name: String,
    /// `(type, name)` pairs in declaration order
    pub fields: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct ParsedEvent {
    pub name: String,
    pub params: Vec<ParsedParam>,
}

#[derive(Debug)]
pub struct ParsedParam {
    pub param_type: String,
    pub name: String,
    pub indexed: bool,
    pub location: Option<String>,
}

#[derive(Debug)]
pub struct ParsedFunction {
    pub name: String,
    pub params: Vec<ParsedParam>,
    pub emitted_event: String,
    pub emit_args: Vec<String>,
}

/// Parses a contract previously rendered by the generator.
pub fn parse_contract_source(source: &str) -> Result<ParsedSource, pest::error::Error<Rule>> {
    let mut pairs = SoliditySourceParser::parse(Rule::source_unit, source)?;
    let mut parsed = ParsedSource::default();

    let unit = match pairs.next() {
        Some(unit) => unit,
        None => return Ok(parsed),
    };

    for pair in unit.into_inner() {
        if pair.as_rule() != Rule::contract {
            continue;
        }
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => parsed.contract_name = item.as_str().to_string(),
                Rule::struct_definition => parsed.structs.push(parse_struct(item)),
                Rule::event_definition => parsed.events.push(parse_event(item)),
                Rule::function_definition => parsed.functions.push(parse_function(item)),
                _ => {}
            }
        }
    }

    debug!(
        contract = %parsed.contract_name,
        structs = parsed.structs.len(),
        events = parsed.events.len(),
        functions = parsed.functions.len(),
        "Parsed generated source"
    );
    Ok(parsed)
}

fn parse_struct(pair: Pair<Rule>) -> ParsedStruct {
    let mut parsed = ParsedStruct {
        name: String::new(),
        fields: Vec::new(),
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier => parsed.name = item.as_str().to_string(),
            Rule::struct_field => {
                let mut inner = item.into_inner();
                let field_type = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                let field_name = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                parsed.fields.push((field_type, field_name));
            }
            _ => {}
        }
    }
    parsed
}

fn parse_event(pair: Pair<Rule>) -> ParsedEvent {
    let mut parsed = ParsedEvent {
        name: String::new(),
        params: Vec::new(),
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier => parsed.name = item.as_str().to_string(),
            Rule::event_parameter => parsed.params.push(parse_param(item)),
            _ => {}
        }
    }
    parsed
}

fn parse_function(pair: Pair<Rule>) -> ParsedFunction {
    let mut parsed = ParsedFunction {
        name: String::new(),
        params: Vec::new(),
        emitted_event: String::new(),
        emit_args: Vec::new(),
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier => parsed.name = item.as_str().to_string(),
            Rule::parameter => parsed.params.push(parse_param(item)),
            Rule::emit_statement => {
                let mut inner = item.into_inner();
                if let Some(event) = inner.next() {
                    parsed.emitted_event = event.as_str().to_string();
                }
                parsed.emit_args = inner.map(|arg| arg.as_str().to_string()).collect();
            }
            _ => {}
        }
    }
    parsed
}

fn parse_param(pair: Pair<Rule>) -> ParsedParam {
    let mut parsed = ParsedParam {
        param_type: String::new(),
        name: String::new(),
        indexed: false,
        location: None,
    };

    for token in pair.into_inner() {
        match token.as_rule() {
            Rule::type_name => parsed.param_type = token.as_str().to_string(),
            Rule::indexed => parsed.indexed = true,
            Rule::data_location => parsed.location = Some(token.as_str().to_string()),
            Rule::identifier => parsed.name = token.as_str().to_string(),
            _ => {}
        }
    }
    parsed
}
