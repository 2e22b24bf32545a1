use bevy::prelude::*;
use bevy::ui::BackgroundColor;

use shelfstock::stocking::plugin::LastStockingReport;

use crate::actions::ShuffleControls;

#[derive(Component)]
pub struct StockingHud;

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::linear_rgba(0.0, 0.0, 0.0, 0.6)),
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new(""),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::WHITE),
            StockingHud,
        ));
    });
}

pub fn update_hud(
    controls: Res<ShuffleControls>,
    report: Res<LastStockingReport>,
    mut query: Query<&mut Text, With<StockingHud>>,
) {
    if !controls.is_changed() && !report.is_changed() { return; }
    let Ok(mut text) = query.single_mut() else { return; };

    let p = controls.params;
    let mut lines = vec![
        format!("density {:.1}  [-/+]", p.density),
        format!("proximity {:.1}  [ [ / ] ]", p.proximity),
        format!("organize {}  [G]   per-group {}  [P]", p.organize, p.per_group),
        "shuffle [Space]   occlusion [O]".to_string(),
    ];
    if let Some(r) = &report.shuffle {
        lines.push(format!(
            "last shuffle: placed {} (random {}, clustered {}), discarded {}, seed {:?}",
            r.placement.placed(),
            r.placement.placed_random,
            r.placement.placed_clustered,
            r.discarded,
            r.seed
        ));
    }
    if let Some(o) = &report.occlusion {
        lines.push(format!("last occlusion: {} of {} hidden", o.hidden, o.objects.len()));
    }
    if let Some(e) = &report.error {
        lines.push(format!("error: {e}"));
    }
    **text = lines.join("\n");
}
