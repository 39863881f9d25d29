use effectograph::extract::EffectExtractor;
use effectograph::render::{DiagramType, PumlRenderer};
use effectograph::syntax::SourceUnit;
use effectograph::DiagramModel;

const SOURCE: &str = r#"
export class OpenSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.OpenSidenav;
}
export class CloseSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.CloseSidenav;
}
export class SidenavToggledEvent implements EventAction {
    readonly type = LayoutEventTypes.SidenavToggled;
}

export class LayoutEffects {
    @Effect()
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

fn main() {
    let unit = SourceUnit::parse("layout.effects.ts", SOURCE).unwrap();
    let effects = EffectExtractor::new(&unit).extract().unwrap();

    println!("=== Extracted effects ===");
    for effect in &effects {
        println!(
            "{}: {:?} -> {:?}",
            effect.name, effect.input_types, effect.output_types
        );
    }

    let model = DiagramModel::new(effects);

    println!("\n=== Activity diagram ===");
    let activity = PumlRenderer::new(DiagramType::Activity)
        .output(&model)
        .unwrap();
    println!("{}", activity);

    println!("\n=== Sequence diagram ===");
    let sequence = PumlRenderer::new(DiagramType::Sequence)
        .output(&model)
        .unwrap();
    println!("{}", sequence);
}
