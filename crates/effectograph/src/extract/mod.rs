//! Effect extraction engine
//!
//! Walks one parsed source unit, finds class members carrying the primary
//! `@Effect()` decorator, and recovers for each the tagging decorators, the
//! consumed discriminators (resolved against the [`ActionTypeRegistry`]),
//! and the produced types from the declared generic type annotation.
//!
//! Extraction never fails for "nothing found" conditions; missing pieces
//! degrade to absent fields. The one hard error is a tagging decorator that
//! supplies explicit input/output references in an unsupported shape.

mod registry;

pub use registry::{ActionTypeRegistry, ACTION_BASE_NAMES};

use tracing::{debug, span, trace, Level};
use tree_sitter::Node;

use crate::core::{non_empty, EffectDefinition, EffectError};
use crate::syntax::helpers::{
    find_child_by_kind, find_children_by_kind, find_preorder, member_name_node, named_children,
    string_literal_value,
};
use crate::syntax::{kinds, SourceUnit};

/// Name of the primary "is an effect" decorator
pub const EFFECT_DECORATOR: &str = "Effect";

/// Name of the type-discriminating pipeline operator
const DISCRIMINATING_OPERATOR: &str = "ofType";

/// Extracts effect definitions from one source unit
pub struct EffectExtractor<'u> {
    unit: &'u SourceUnit,
}

impl<'u> EffectExtractor<'u> {
    pub fn new(unit: &'u SourceUnit) -> Self {
        Self { unit }
    }

    /// Extract every effect definition of the unit, in source order
    ///
    /// Returns an empty vector when no decorated members exist; the caller
    /// decides whether that is fatal.
    pub fn extract(&self) -> Result<Vec<EffectDefinition>, EffectError> {
        let extract_span = span!(
            Level::INFO,
            "extract_effects",
            path = %self.unit.path().display()
        );
        let _enter = extract_span.enter();

        let registry = ActionTypeRegistry::build(self.unit);

        let mut effects = Vec::new();
        for class in self.unit.classes() {
            for member in self.unit.instance_members(&class) {
                if !self.has_effect_decorator(&member) {
                    continue;
                }
                effects.push(self.extract_member(&member, &registry)?);
            }
        }

        debug!(count = effects.len(), "extraction finished");
        Ok(effects)
    }

    fn extract_member(
        &self,
        member: &Node,
        registry: &ActionTypeRegistry,
    ) -> Result<EffectDefinition, EffectError> {
        let name = member_name_node(member)
            .map(|n| self.unit.text(&n).to_string())
            .ok_or_else(|| {
                EffectError::parse_failure(
                    self.unit.path().display().to_string(),
                    "effect member without a name",
                )
            })?;
        trace!(member = name.as_str(), "extracting effect member");

        let tagging_decorators = self.tagging_decorator_names(member);
        let (explicit_inputs, explicit_outputs) = self.decorator_supplied_types(member, &name)?;

        let input_types = match explicit_inputs {
            Some(inputs) => Some(inputs),
            None => non_empty(self.mine_input_types(member, registry)),
        };
        let output_types = match explicit_outputs {
            Some(outputs) => Some(outputs),
            None => non_empty(self.declared_output_types(member)),
        };

        Ok(EffectDefinition {
            name,
            tagging_decorators: non_empty(tagging_decorators),
            input_types,
            output_types,
        })
    }

    /// Decorators attached to a class member, in source order
    ///
    /// The grammar attaches member decorators either as children of the
    /// member node or as its preceding siblings in the class body; both
    /// shapes are collected. Comments interleaved with the decorators do
    /// not end the sibling walk.
    fn decorator_nodes<'t>(&self, member: &Node<'t>) -> Vec<Node<'t>> {
        let mut decorators = Vec::new();
        let mut cursor = member.prev_named_sibling();
        while let Some(sibling) = cursor {
            match sibling.kind() {
                kinds::DECORATOR => decorators.push(sibling),
                kinds::COMMENT => {}
                _ => break,
            }
            cursor = sibling.prev_named_sibling();
        }
        decorators.reverse();
        decorators.extend(find_children_by_kind(member, kinds::DECORATOR));
        decorators
    }

    /// Name of a decorator, without the `@` and without call arguments
    fn decorator_name(&self, decorator: &Node) -> Option<String> {
        let inner = decorator.named_child(0)?;
        let name_node = match inner.kind() {
            kinds::CALL_EXPRESSION => inner.child_by_field_name("function")?,
            _ => inner,
        };
        Some(self.unit.text(&name_node).to_string())
    }

    fn has_effect_decorator(&self, member: &Node) -> bool {
        self.decorator_nodes(member)
            .iter()
            .any(|d| self.decorator_name(d).as_deref() == Some(EFFECT_DECORATOR))
    }

    /// Names of all non-`Effect` decorators, in source order
    fn tagging_decorator_names(&self, member: &Node) -> Vec<String> {
        self.decorator_nodes(member)
            .iter()
            .filter_map(|d| self.decorator_name(d))
            .filter(|name| name != EFFECT_DECORATOR)
            .collect()
    }

    /// Explicit input/output references from the first tagging decorator
    ///
    /// A tagging decorator may carry the consumed and produced types as its
    /// two arguments, each either a single identifier or an array of
    /// identifiers. No arguments means the decorator only classifies the
    /// effect; any other shape is a hard error.
    fn decorator_supplied_types(
        &self,
        member: &Node,
        member_name: &str,
    ) -> Result<(Option<Vec<String>>, Option<Vec<String>>), EffectError> {
        let decorators = self.decorator_nodes(member);
        let Some(tagging) = decorators
            .iter()
            .find(|d| self.decorator_name(d).as_deref() != Some(EFFECT_DECORATOR))
        else {
            return Ok((None, None));
        };

        let Some(inner) = tagging.named_child(0) else {
            return Ok((None, None));
        };
        if inner.kind() != kinds::CALL_EXPRESSION {
            return Ok((None, None));
        }
        let Some(arguments) = inner.child_by_field_name("arguments") else {
            return Ok((None, None));
        };
        let argument_nodes = named_children(&arguments);

        match argument_nodes.as_slice() {
            [] => Ok((None, None)),
            [inputs, outputs] => {
                let inputs = self.argument_references(inputs).map_err(|message| {
                    EffectError::malformed_annotation_arguments(member_name, message)
                })?;
                let outputs = self.argument_references(outputs).map_err(|message| {
                    EffectError::malformed_annotation_arguments(member_name, message)
                })?;
                Ok((Some(inputs), Some(outputs)))
            }
            other => Err(EffectError::malformed_annotation_arguments(
                member_name,
                format!(
                    "expected no arguments or exactly two, found {}",
                    other.len()
                ),
            )),
        }
    }

    /// Read an explicit type-reference argument: an identifier or an array
    /// of identifiers
    fn argument_references(&self, argument: &Node) -> Result<Vec<String>, String> {
        match argument.kind() {
            kinds::IDENTIFIER => Ok(vec![self.unit.text(argument).to_string()]),
            kinds::ARRAY => {
                let mut references = Vec::new();
                for element in named_children(argument) {
                    if element.kind() != kinds::IDENTIFIER {
                        return Err(format!(
                            "array element `{}` is not a type reference",
                            self.unit.text(&element)
                        ));
                    }
                    references.push(self.unit.text(&element).to_string());
                }
                Ok(references)
            }
            other => Err(format!(
                "argument `{}` ({}) is neither a reference nor a list of references",
                self.unit.text(argument),
                other
            )),
        }
    }

    /// Mine the discriminators of the pipeline's `ofType` call and resolve
    /// them against the registry
    fn mine_input_types(&self, member: &Node, registry: &ActionTypeRegistry) -> Vec<String> {
        let Some(value) = member.child_by_field_name("value") else {
            return Vec::new();
        };
        let source = self.unit.source();
        let of_type_call = find_preorder(value, &|node: &Node| {
            if node.kind() != kinds::CALL_EXPRESSION {
                return false;
            }
            node.child_by_field_name("function").is_some_and(|callee| {
                callee.kind() == kinds::IDENTIFIER
                    && &source[callee.start_byte()..callee.end_byte()] == DISCRIMINATING_OPERATOR
            })
        });
        let Some(call) = of_type_call else {
            return Vec::new();
        };
        let Some(arguments) = call.child_by_field_name("arguments") else {
            return Vec::new();
        };

        named_children(&arguments)
            .iter()
            .filter_map(|argument| match argument.kind() {
                kinds::MEMBER_EXPRESSION => Some(self.unit.text(argument).to_string()),
                kinds::STRING => {
                    Some(string_literal_value(argument, self.unit.source()).to_string())
                }
                _ => None,
            })
            .map(|discriminator| registry.resolve_or_literal(&discriminator))
            .collect()
    }

    /// Read the generic arguments of the member's declared type annotation,
    /// flattening union types into their constituents
    fn declared_output_types(&self, member: &Node) -> Vec<String> {
        let Some(annotation) = find_child_by_kind(member, kinds::TYPE_ANNOTATION) else {
            return Vec::new();
        };
        let Some(declared) = annotation.named_child(0) else {
            return Vec::new();
        };
        if declared.kind() != kinds::GENERIC_TYPE {
            return Vec::new();
        }
        let Some(type_arguments) = declared.child_by_field_name("type_arguments") else {
            return Vec::new();
        };

        let mut outputs = Vec::new();
        for argument in named_children(&type_arguments) {
            self.collect_type_names(&argument, &mut outputs);
        }
        outputs
    }

    fn collect_type_names(&self, node: &Node, out: &mut Vec<String>) {
        if node.kind() == kinds::UNION_TYPE {
            for constituent in named_children(node) {
                self.collect_type_names(&constituent, out);
            }
        } else {
            out.push(self.unit.text(node).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Effects source in the shape the pipeline targets: action classes with
    /// property-access discriminators, plus `@Effect()` members over
    /// `ofType` pipelines.
    const FIXTURE: &str = r#"
import { Observable } from 'rxjs/Observable';
import { concatMap, map } from 'rxjs/operators';
import { Actions, Effect, ofType } from '@ngrx/effects';

export enum LayoutCommandTypes {
    OpenSidenav = '[Layout] Open Sidenav',
    CloseSidenav = '[Layout] Close Sidenav',
    LogSidenav = '[Layout] Log Sidenav'
}
export enum LayoutEventTypes {
    SidenavOpened = '[Layout] Sidenav Opened',
    SidenavClosed = '[Layout] Sidenav Closed',
    SidenavToggled = '[Layout] Sidenav toggled'
}

export class OpenSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.OpenSidenav;
}
export class CloseSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.CloseSidenav;
}
export class LogSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.LogSidenav;
}
export class SidenavOpenedEvent implements EventAction {
    readonly type = LayoutEventTypes.SidenavOpened;
}
export class SidenavClosedEvent implements EventAction {
    readonly type = LayoutEventTypes.SidenavClosed;
}
export class SidenavToggledEvent implements EventAction {
    readonly type = LayoutEventTypes.SidenavToggled;
}

export type LayoutCommands = OpenSidenavCommand | CloseSidenavCommand | LogSidenavCommand;

export class LayoutEffects {

    @Effect()
    SIDENAV_OPENED: Observable<SidenavOpenedEvent> = this._actions.pipe(
        ofType<LayoutCommands>(LayoutCommandTypes.OpenSidenav),
        map(() => new SidenavOpenedEvent())
    );

    @Effect()
    SIDENAV_CLOSED: Observable<SidenavClosedEvent> = this._actions.pipe(
        ofType<LayoutCommands>(LayoutCommandTypes.CloseSidenav),
        map(() => new SidenavClosedEvent())
    );

    @Effect()
    WEIRD_SIDENAV: Observable<SidenavClosedEvent | LogSidenavCommand> = this._actions.pipe(
        ofType<LayoutCommands>(LayoutCommandTypes.CloseSidenav),
        concatMap(() => [
            new SidenavClosedEvent(),
            new LogSidenavCommand()
        ])
    );

    @Effect()
    @_AggregatorDecider()
    ALL_SIDENAV: Observable<SidenavToggledEvent> = this._actions.pipe(
        ofType<LayoutCommands>(
            LayoutCommandTypes.OpenSidenav,
            LayoutCommandTypes.CloseSidenav
        ),
        map(() => new SidenavToggledEvent())
    );

    constructor(private _actions: Actions) {}
}
"#;

    fn extract(source: &str) -> Vec<EffectDefinition> {
        let unit = SourceUnit::parse("test.effects.ts", source).unwrap();
        EffectExtractor::new(&unit).extract().unwrap()
    }

    #[test]
    fn test_extracts_all_decorated_members_in_order() {
        let effects = extract(FIXTURE);
        let names: Vec<&str> = effects.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["SIDENAV_OPENED", "SIDENAV_CLOSED", "WEIRD_SIDENAV", "ALL_SIDENAV"]
        );
    }

    #[test]
    fn test_single_input_single_output() {
        let effects = extract(FIXTURE);
        let opened = &effects[0];
        assert_eq!(opened.tagging_decorators, None);
        assert_eq!(
            opened.input_types.as_deref(),
            Some(&["OpenSidenavCommand".to_string()][..])
        );
        assert_eq!(
            opened.output_types.as_deref(),
            Some(&["SidenavOpenedEvent".to_string()][..])
        );
    }

    #[test]
    fn test_union_output_is_flattened_in_order() {
        let effects = extract(FIXTURE);
        let weird = &effects[2];
        assert_eq!(
            weird.output_types.as_deref(),
            Some(&["SidenavClosedEvent".to_string(), "LogSidenavCommand".to_string()][..])
        );
    }

    #[test]
    fn test_multiple_discriminators_preserve_source_order() {
        let effects = extract(FIXTURE);
        let all = &effects[3];
        assert_eq!(
            all.tagging_decorators.as_deref(),
            Some(&["_AggregatorDecider".to_string()][..])
        );
        assert_eq!(
            all.input_types.as_deref(),
            Some(&["OpenSidenavCommand".to_string(), "CloseSidenavCommand".to_string()][..])
        );
    }

    #[test]
    fn test_no_decorated_members_yields_empty() {
        let effects = extract("export class Plain { field = 1; }");
        assert!(effects.is_empty());
    }

    #[test]
    fn test_comment_between_decorator_and_member_is_ignored() {
        let source = r#"
export class Effects {
    @Effect()
    // Splitter
    WEIRD_SIDENAV: Observable<SidenavClosedEvent | LogSidenavCommand> = this._actions.pipe(
        ofType(LayoutCommandTypes.CloseSidenav),
        concatMap(() => [new SidenavClosedEvent(), new LogSidenavCommand()])
    );
}
"#;
        let effects = extract(source);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].name, "WEIRD_SIDENAV");
        assert_eq!(effects[0].tagging_decorators, None);
    }

    #[test]
    fn test_unresolved_discriminator_kept_verbatim() {
        let source = r#"
export class Effects {
    @Effect()
    MYSTERY: Observable<SomeEvent> = this._actions.pipe(
        ofType(UnknownTypes.Mystery),
        map(() => new SomeEvent())
    );
}
"#;
        let effects = extract(source);
        assert_eq!(
            effects[0].input_types.as_deref(),
            Some(&["UnknownTypes.Mystery".to_string()][..])
        );
    }

    #[test]
    fn test_string_discriminator_kept_verbatim_when_unresolvable() {
        let source = r#"
export class Effects {
    @Effect()
    UNKNOWN: Observable<SomeEvent> = this._actions.pipe(
        ofType('[X] UNKNOWN'),
        map(() => new SomeEvent())
    );
}
"#;
        let effects = extract(source);
        assert_eq!(
            effects[0].input_types.as_deref(),
            Some(&["[X] UNKNOWN".to_string()][..])
        );
    }

    #[test]
    fn test_member_without_pipeline_or_annotation_has_absent_types() {
        let source = r#"
export class Effects {
    @Effect()
    BARE = somethingElse();
}
"#;
        let effects = extract(source);
        assert_eq!(effects[0].input_types, None);
        assert_eq!(effects[0].output_types, None);
    }

    #[test]
    fn test_decorator_supplied_types_take_precedence() {
        let source = r#"
export class Effects {
    @Effect()
    @ContentBasedDecider(FooCommand, [BarEvent, BazEvent])
    DECIDE: Observable<IgnoredEvent> = this._actions.pipe(
        ofType(Types.AlsoIgnored),
        map(() => new BarEvent())
    );
}
"#;
        let effects = extract(source);
        assert_eq!(
            effects[0].input_types.as_deref(),
            Some(&["FooCommand".to_string()][..])
        );
        assert_eq!(
            effects[0].output_types.as_deref(),
            Some(&["BarEvent".to_string(), "BazEvent".to_string()][..])
        );
    }

    #[test]
    fn test_classifying_decorator_without_arguments_falls_back_to_mining() {
        let effects = extract(FIXTURE);
        let all = &effects[3];
        // `@_AggregatorDecider()` carries no explicit references, so the
        // pipeline and the type annotation are used.
        assert_eq!(
            all.output_types.as_deref(),
            Some(&["SidenavToggledEvent".to_string()][..])
        );
    }

    #[test]
    fn test_wrong_argument_count_is_malformed() {
        let source = r#"
export class Effects {
    @Effect()
    @Decider(OnlyOne)
    BROKEN: Observable<SomeEvent> = this._actions.pipe(ofType(Types.X));
}
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        let result = EffectExtractor::new(&unit).extract();
        match result {
            Err(EffectError::MalformedAnnotationArguments { member, .. }) => {
                assert_eq!(member, "BROKEN");
            }
            other => panic!("expected MalformedAnnotationArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_non_reference_argument_is_malformed() {
        let source = r#"
export class Effects {
    @Effect()
    @Decider('not-a-reference', [BarEvent])
    BROKEN: Observable<SomeEvent> = this._actions.pipe(ofType(Types.X));
}
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        let result = EffectExtractor::new(&unit).extract();
        assert!(matches!(
            result,
            Err(EffectError::MalformedAnnotationArguments { .. })
        ));
    }

    #[test]
    fn test_non_generic_annotation_yields_absent_outputs() {
        let source = r#"
export class Effects {
    @Effect()
    PLAIN: SomeEvent = this._actions.pipe(ofType(Types.X));
}
"#;
        let effects = extract(source);
        assert_eq!(effects[0].output_types, None);
    }
}
