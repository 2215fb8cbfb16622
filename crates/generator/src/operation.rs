//! Assembly of one operation from one endpoint document
//!
//! Assembly runs in two phases. Planning reads the title, description,
//! parameters and every body/response table, validating all of it without
//! touching the schema registry. Committing then writes the planned schemas
//! into the registry and cannot fail, so a rejected document never leaves
//! partial schemas behind.

use crate::field_table::{FieldRow, FieldTableReader};
use crate::parameters::{ParameterDescriptor, ParameterExtractor};
use crate::schema::{SchemaRef, SchemaRegistry};
use crate::schema_builder::{capitalize, title_case, SchemaBuilder};
use crate::table_after;
use docs2oas_common::{ConversionError, Node, NodeTree, RequiredStyle, Result};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

const DESCRIPTION_PREFIX: &str = "description:";
const RESPONSES_HEADING: &str = "Responses";
const BODY_HEADING: &str = "Body";
const CONTENT_MARKER: &str = "content";
const DEFAULT_STATUS: &str = "default";

/// HTTP methods an OpenAPI path item can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Lowercase name as used for path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "trace" => Ok(HttpMethod::Trace),
            _ => Err(ConversionError::MissingRequiredSection(format!(
                "title has unsupported HTTP method '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and URL from a document's title line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub url: String,
}

impl Endpoint {
    /// Parse a `"<METHOD> <url>"` title
    pub fn parse_title(title: &str) -> Result<Self> {
        let parts: Vec<&str> = title.split_whitespace().collect();
        let [method, url] = parts.as_slice() else {
            return Err(ConversionError::MissingRequiredSection(format!(
                "title must read '<METHOD> <url>', found '{}'",
                title
            )));
        };

        Ok(Self {
            method: method.parse()?,
            url: url.to_string(),
        })
    }

    /// PascalCase prefix for every schema this operation owns.
    ///
    /// Non-alphanumeric characters separate words, and each word is title
    /// cased: `GET /users/{user_id}` becomes `GetUsersUserId`,
    /// `GET /userProfiles/{userId}` becomes `GetUserprofilesUserid`.
    pub fn base_schema_name(&self) -> String {
        let spaced: String = format!("{} {}", self.method.as_str(), self.url)
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        spaced.split_whitespace().map(title_case).collect()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.as_str().to_uppercase(), self.url)
    }
}

/// Whether a status code reports success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Error,
}

impl ResponseClass {
    /// `2xx` is success, anything else is an error
    pub fn of(status: &str) -> Self {
        if status.starts_with('2') {
            ResponseClass::Success
        } else {
            ResponseClass::Error
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseClass::Success => "Success",
            ResponseClass::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyDescriptor {
    pub schema: SchemaRef,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub description: String,
    pub content: Option<SchemaRef>,
}

/// Everything recorded for one method on one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub request_body: Option<RequestBodyDescriptor>,
    /// Keyed by status code, in document order
    pub responses: IndexMap<String, ResponseDescriptor>,
}

/// A schema whose rows have been read but not yet registered
#[derive(Debug)]
struct PendingSchema {
    name: String,
    rows: Vec<FieldRow>,
}

#[derive(Debug)]
struct PendingResponse {
    status: String,
    description: String,
    content: Option<PendingSchema>,
}

#[derive(Debug)]
struct OperationPlan {
    endpoint: Endpoint,
    description: String,
    parameters: Vec<ParameterDescriptor>,
    body: Option<PendingSchema>,
    responses: Vec<PendingResponse>,
}

/// Builds one [`OperationDescriptor`] per endpoint document
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationAssembler {
    parameters: ParameterExtractor,
}

impl OperationAssembler {
    pub fn new(style: RequiredStyle) -> Self {
        Self {
            parameters: ParameterExtractor::new(style),
        }
    }

    /// Assemble the operation described by `tree`, registering its body and
    /// response schemas. On error the registry is left unchanged.
    pub fn assemble(
        &self,
        tree: &NodeTree,
        registry: &mut SchemaRegistry,
    ) -> Result<(Endpoint, OperationDescriptor)> {
        let plan = self.plan(tree)?;
        Ok(commit(plan, registry))
    }

    fn plan(&self, tree: &NodeTree) -> Result<OperationPlan> {
        let (_, title) = tree.first_heading(1).ok_or_else(|| {
            ConversionError::MissingRequiredSection("title heading '# <METHOD> <url>'".to_string())
        })?;
        let endpoint = Endpoint::parse_title(title)?;

        let (_, description_line) = tree.first_heading(2).ok_or_else(|| {
            ConversionError::MissingRequiredSection(
                "description heading '## description: <text>'".to_string(),
            )
        })?;
        let description = strip_description_prefix(description_line);

        let base_name = endpoint.base_schema_name();
        let parameters = self.parameters.extract(tree)?;
        let body = plan_body(tree, &base_name)?;
        let responses = plan_responses(tree, &base_name)?;

        Ok(OperationPlan {
            endpoint,
            description,
            parameters,
            body,
            responses,
        })
    }
}

fn strip_description_prefix(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.get(..DESCRIPTION_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(DESCRIPTION_PREFIX) => {
            trimmed[DESCRIPTION_PREFIX.len()..].trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

fn plan_body(tree: &NodeTree, base_name: &str) -> Result<Option<PendingSchema>> {
    let Some(index) = tree.find_heading(4, BODY_HEADING) else {
        return Ok(None);
    };

    let table = table_after(tree, index, BODY_HEADING)?;
    Ok(Some(PendingSchema {
        name: format!("{}RequestBody", base_name),
        rows: FieldTableReader::new(table).read_all()?,
    }))
}

fn plan_responses(tree: &NodeTree, base_name: &str) -> Result<Vec<PendingResponse>> {
    let Some(responses_index) = tree.find_heading(3, RESPONSES_HEADING) else {
        return Ok(Vec::new());
    };

    let mut responses = Vec::new();
    let section_start = responses_index + 1;

    for (offset, node) in tree.section(responses_index).iter().enumerate() {
        let Node::Heading { level: 4, text } = node else {
            continue;
        };

        // `#### 200 OK` names status 200
        let status = text.split_whitespace().next().ok_or_else(|| {
            ConversionError::MissingRequiredSection(
                "empty status code heading under Responses".to_string(),
            )
        })?;

        let status = parse_status(status)?;
        let class = ResponseClass::of(&status);
        let content = plan_response_content(tree, section_start + offset, &status)?
            .map(|rows| PendingSchema {
                name: format!("{}Response{}Content", base_name, capitalize(&status)),
                rows,
            });

        responses.push(PendingResponse {
            status: status.clone(),
            description: format!("{} {}", class.label(), status),
            content,
        });
    }

    Ok(responses)
}

/// A status heading token: digits (`200`) or `default`
fn parse_status(token: &str) -> Result<String> {
    if token.eq_ignore_ascii_case(DEFAULT_STATUS) {
        return Ok(DEFAULT_STATUS.to_string());
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return Ok(token.to_string());
    }
    Err(ConversionError::MissingRequiredSection(format!(
        "heading '{}' under Responses is not a status code",
        token
    )))
}

/// Rows of the table following a `Content` paragraph in a status subsection
fn plan_response_content(
    tree: &NodeTree,
    status_index: usize,
    status: &str,
) -> Result<Option<Vec<FieldRow>>> {
    let subsection = tree.section(status_index);
    let Some(marker) = subsection.iter().position(|node| {
        node.as_paragraph()
            .is_some_and(|text| text.trim().eq_ignore_ascii_case(CONTENT_MARKER))
    }) else {
        return Ok(None);
    };

    let table = subsection[marker + 1..]
        .iter()
        .find_map(Node::as_table)
        .ok_or_else(|| {
            ConversionError::MalformedTable(format!(
                "response {}: 'Content' is not followed by a table",
                status
            ))
        })?;

    FieldTableReader::new(table).read_all().map(Some)
}

fn commit(plan: OperationPlan, registry: &mut SchemaRegistry) -> (Endpoint, OperationDescriptor) {
    let mut builder = SchemaBuilder::new(registry);

    let request_body = plan.body.map(|pending| RequestBodyDescriptor {
        schema: builder.build_from_rows(&pending.name, &pending.rows),
        required: true,
    });

    let responses = plan
        .responses
        .into_iter()
        .map(|response| {
            let content = response
                .content
                .map(|pending| builder.build_from_rows(&pending.name, &pending.rows));
            (
                response.status,
                ResponseDescriptor {
                    description: response.description,
                    content,
                },
            )
        })
        .collect();

    (
        plan.endpoint,
        OperationDescriptor {
            description: plan.description,
            parameters: plan.parameters,
            request_body,
            responses,
        },
    )
}
