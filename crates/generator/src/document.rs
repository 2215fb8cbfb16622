//! Merging operations into the specification document

use crate::operation::{Endpoint, HttpMethod, OperationAssembler, OperationDescriptor};
use crate::schema::SchemaRegistry;
use docs2oas_common::{ConverterConfig, DocumentFailure, DocumentSource, NodeTree, Result};
use indexmap::IndexMap;

/// Operations keyed by URL then method, plus every schema they reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecDocument {
    pub paths: IndexMap<String, IndexMap<HttpMethod, OperationDescriptor>>,
    pub schemas: SchemaRegistry,
}

impl SpecDocument {
    pub fn operation(&self, url: &str, method: HttpMethod) -> Option<&OperationDescriptor> {
        self.paths.get(url).and_then(|methods| methods.get(&method))
    }

    /// Number of (url, method) entries
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }
}

/// Outcome of a conversion run
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Every operation that converted successfully
    pub document: SpecDocument,
    pub failures: Vec<DocumentFailure>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Accumulates operations from documents fed one at a time
#[derive(Debug, Default)]
pub struct SpecDocumentAssembler {
    assembler: OperationAssembler,
    report: ConversionReport,
}

impl SpecDocumentAssembler {
    pub fn new(assembler: OperationAssembler) -> Self {
        Self {
            assembler,
            report: ConversionReport::default(),
        }
    }

    /// Convert one document into the shared document.
    ///
    /// On failure the error is recorded against the document's source and
    /// `None` is returned; nothing from that document is kept.
    pub fn add_document(&mut self, tree: &NodeTree) -> Option<Endpoint> {
        let document = &mut self.report.document;
        match self.assembler.assemble(tree, &mut document.schemas) {
            Ok((endpoint, operation)) => {
                document
                    .paths
                    .entry(endpoint.url.clone())
                    .or_default()
                    .insert(endpoint.method, operation);
                Some(endpoint)
            }
            Err(error) => {
                self.report.failures.push(DocumentFailure {
                    source: tree.source.clone(),
                    error,
                });
                None
            }
        }
    }

    /// Record a document that never reached conversion
    pub fn record_failure(&mut self, failure: DocumentFailure) {
        self.report.failures.push(failure);
    }

    pub fn finish(self) -> ConversionReport {
        self.report
    }
}

/// Runs a whole conversion with one configuration
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert every document; failures never abort the run
    pub fn convert(&self, documents: &[NodeTree]) -> ConversionReport {
        let mut assembler = self.assembler();
        for tree in documents {
            assembler.add_document(tree);
        }
        assembler.finish()
    }

    /// Load documents from `source`, then convert them.
    ///
    /// Only a failure of the source itself is returned as an error. Documents
    /// the source could not read are reported alongside conversion failures.
    pub fn convert_source(&self, source: &dyn DocumentSource) -> Result<ConversionReport> {
        let batch = source.documents()?;
        let mut assembler = self.assembler();
        for failure in batch.failures {
            assembler.record_failure(failure);
        }
        for tree in &batch.documents {
            assembler.add_document(tree);
        }
        Ok(assembler.finish())
    }

    fn assembler(&self) -> SpecDocumentAssembler {
        SpecDocumentAssembler::new(OperationAssembler::new(self.config.parameter_required))
    }
}

/// Convert with the default configuration
pub fn convert(documents: &[NodeTree]) -> ConversionReport {
    Converter::default().convert(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs2oas_common::{
        ConversionError, DocumentBatch, MockDocumentSource, Node, RequiredStyle, Table,
    };

    fn doc(source: &str, title: &str, body: &[(&str, &str)]) -> NodeTree {
        let mut nodes = vec![
            Node::heading(1, title),
            Node::heading(2, format!("description: {}", title)),
        ];
        if !body.is_empty() {
            nodes.push(Node::heading(4, "Body"));
            nodes.push(Node::Table(Table {
                headers: vec!["Field".into(), "Type".into()],
                rows: body
                    .iter()
                    .map(|(p, t)| vec![p.to_string(), t.to_string()])
                    .collect(),
            }));
        }
        NodeTree::new(source, nodes)
    }

    #[test]
    fn test_methods_merge_under_one_url() {
        let report = convert(&[
            doc("get.md", "GET /users", &[]),
            doc("post.md", "POST /users", &[("name", "string")]),
        ]);

        assert!(report.is_clean());
        let methods: Vec<HttpMethod> = report.document.paths["/users"].keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(report.document.operation_count(), 2);
    }

    #[test]
    fn test_same_method_overwrites_only_that_entry() {
        let report = convert(&[
            doc("get.md", "GET /users", &[]),
            doc("post_v1.md", "POST /users", &[]),
            doc("post_v2.md", "post /users", &[]),
        ]);

        let users = &report.document.paths["/users"];
        assert_eq!(users.len(), 2);
        assert_eq!(users[&HttpMethod::Post].description, "post /users");
        assert_eq!(users[&HttpMethod::Get].description, "GET /users");
    }

    #[test]
    fn test_failure_is_isolated() {
        let report = convert(&[
            doc("ok_a.md", "GET /a", &[("id", "integer")]),
            doc("bad.md", "GET /b", &[("id", "uuid")]),
            doc("ok_c.md", "GET /c", &[]),
        ]);

        assert_eq!(report.document.operation_count(), 2);
        assert!(report.document.operation("/b", HttpMethod::Get).is_none());
        assert!(!report.document.paths.contains_key("/b"));
        assert!(!report.document.schemas.contains("GetBRequestBody"));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "bad.md");
        assert!(matches!(
            report.failures[0].error,
            ConversionError::UnknownType(_)
        ));
    }

    #[test]
    fn test_registry_accumulates_across_documents() {
        let report = convert(&[
            doc("a.md", "POST /a", &[("x", "string")]),
            doc("b.md", "POST /b", &[("y", "string")]),
        ]);

        let names: Vec<&str> = report
            .document
            .schemas
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["PostARequestBody", "PostBRequestBody"]);
    }

    #[test]
    fn test_converter_uses_configured_style() {
        let tree = NodeTree::new(
            "search.md",
            vec![
                Node::heading(1, "GET /search"),
                Node::heading(2, "description: Search"),
                Node::heading(4, "Query"),
                Node::Table(Table {
                    headers: vec!["Field".into(), "Type".into()],
                    rows: vec![vec!["q".into(), "string".into()]],
                }),
            ],
        );

        let marker = Converter::default().convert(std::slice::from_ref(&tree));
        assert!(marker.is_clean());

        let config = ConverterConfig {
            parameter_required: RequiredStyle::Column,
            ..ConverterConfig::default()
        };
        let column = Converter::new(config).convert(&[tree]);
        assert_eq!(column.failures.len(), 1);
        assert_eq!(column.document.operation_count(), 0);
    }

    #[test]
    fn test_convert_source() {
        let mut source = MockDocumentSource::new();
        source
            .expect_documents()
            .times(1)
            .returning(|| {
                Ok(DocumentBatch::from_documents(vec![doc(
                    "ping.md",
                    "GET /ping",
                    &[],
                )]))
            });

        let report = Converter::default().convert_source(&source).unwrap();
        assert!(report.document.operation("/ping", HttpMethod::Get).is_some());
    }

    #[test]
    fn test_convert_source_keeps_unreadable_documents_as_failures() {
        let mut source = MockDocumentSource::new();
        source.expect_documents().returning(|| {
            Ok(DocumentBatch {
                documents: vec![
                    doc("a.md", "GET /a", &[]),
                    doc("c.md", "GET /c", &[("id", "uuid")]),
                ],
                failures: vec![DocumentFailure {
                    source: "b.md".to_string(),
                    error: ConversionError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "stream did not contain valid UTF-8",
                    )),
                }],
            })
        });

        let report = Converter::default().convert_source(&source).unwrap();

        assert_eq!(report.document.operation_count(), 1);
        assert!(report.document.operation("/a", HttpMethod::Get).is_some());
        let sources: Vec<&str> = report.failures.iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["b.md", "c.md"]);
        assert!(matches!(report.failures[0].error, ConversionError::Io(_)));
    }

    #[test]
    fn test_convert_source_failure_is_fatal() {
        let mut source = MockDocumentSource::new();
        source
            .expect_documents()
            .returning(|| Err(ConversionError::Parse("Not a directory: api".to_string())));

        assert!(Converter::default().convert_source(&source).is_err());
    }
}
