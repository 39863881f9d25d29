//! tree-sitter-typescript node kinds used by the extraction pipeline
//!
//! These constants match the exact node type names from the
//! tree-sitter-typescript grammar, so no magic strings appear in the
//! traversal code.

/// Program structure
pub const PROGRAM: &str = "program";

/// Declarations
pub const CLASS_DECLARATION: &str = "class_declaration";
pub const PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
pub const METHOD_DEFINITION: &str = "method_definition";

/// Import/export
pub const IMPORT_STATEMENT: &str = "import_statement";
pub const EXPORT_STATEMENT: &str = "export_statement";

/// Heritage
pub const CLASS_HERITAGE: &str = "class_heritage";
pub const EXTENDS_CLAUSE: &str = "extends_clause";
pub const IMPLEMENTS_CLAUSE: &str = "implements_clause";

/// Types
pub const TYPE_ANNOTATION: &str = "type_annotation";
pub const TYPE_ARGUMENTS: &str = "type_arguments";
pub const GENERIC_TYPE: &str = "generic_type";
pub const UNION_TYPE: &str = "union_type";

/// Expressions
pub const CALL_EXPRESSION: &str = "call_expression";
pub const MEMBER_EXPRESSION: &str = "member_expression";
pub const IDENTIFIER: &str = "identifier";
pub const PROPERTY_IDENTIFIER: &str = "property_identifier";
pub const ARRAY: &str = "array";
pub const STRING: &str = "string";
pub const STRING_FRAGMENT: &str = "string_fragment";

/// Decorators and modifiers
pub const DECORATOR: &str = "decorator";
pub const STATIC: &str = "static";

/// Extras
pub const COMMENT: &str = "comment";
