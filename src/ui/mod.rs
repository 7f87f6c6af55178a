//! User interface: HUD (timer, score), start / play-again button, end message
//! and the optional on-screen arrows for touch devices.
//!
//! Text and visibility are mutated directly each frame from the game context;
//! there is no templating.

use bevy::prelude::*;

use crate::context::{GameContext, GameSignal};
use crate::input::{Direction, StartButton, TouchControl};
use crate::session::SessionPhase;
use crate::settings::Settings;

pub const START_LABEL: &str = "Start game";
pub const RESTART_LABEL: &str = "Play again";
pub const GAME_OVER_MESSAGE: &str = "The meteor has struck!";

/// Text nodes kept in sync with the game state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Timer,
    Score,
    StartLabel,
}

/// UI nodes whose visibility follows the session phase.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudPanel {
    StartButton,
    GameOver,
    TouchControls,
}

#[must_use]
pub fn timer_text(remaining: u32) -> String {
    format!("Time: {remaining}s")
}

#[must_use]
pub fn score_text(score: u32) -> String {
    format!("Meat: {score}")
}

/// Label on the start button for a given phase.
#[must_use]
pub fn start_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Ended => RESTART_LABEL,
        SessionPhase::Idle | SessionPhase::Active => START_LABEL,
    }
}

/// Which panels are visible for a given phase.
#[must_use]
pub fn panel_visible(panel: HudPanel, phase: SessionPhase, touch_controls: bool) -> bool {
    match panel {
        HudPanel::StartButton => phase != SessionPhase::Active,
        HudPanel::GameOver => phase == SessionPhase::Ended,
        HudPanel::TouchControls => touch_controls,
    }
}

fn label(value: impl Into<String>, size: f32, color: Color) -> TextBundle {
    TextBundle::from_section(
        value,
        TextStyle {
            font_size: size,
            color,
            ..default()
        },
    )
}

/// Spawn the HUD panel and, hidden, the touch arrows.
///
/// # Arguments
/// * `commands` - `Commands` used to spawn UI nodes
/// * `duration` - initial countdown shown before the first round
pub fn spawn_hud(commands: &mut Commands, duration: u32) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(16.0),
                top: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(10.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            background_color: Color::srgba(0.0, 0.0, 0.0, 0.7).into(),
            border_radius: BorderRadius::all(Val::Px(5.0)),
            z_index: ZIndex::Global(100),
            ..default()
        })
        .with_children(|p| {
            p.spawn((label(timer_text(duration), 24.0, Color::WHITE), HudText::Timer));
            p.spawn((label(score_text(0), 20.0, Color::WHITE), HudText::Score));
            p.spawn((
                ButtonBundle {
                    style: Style {
                        padding: UiRect::axes(Val::Px(20.0), Val::Px(10.0)),
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    background_color: Color::srgb(0.30, 0.69, 0.31).into(),
                    border_radius: BorderRadius::all(Val::Px(5.0)),
                    ..default()
                },
                StartButton,
                HudPanel::StartButton,
            ))
            .with_children(|b| {
                b.spawn((label(START_LABEL, 18.0, Color::WHITE), HudText::StartLabel));
            });
            p.spawn((
                label(GAME_OVER_MESSAGE, 24.0, Color::srgb(1.0, 0.0, 0.0)),
                HudPanel::GameOver,
            ))
            .insert(Visibility::Hidden);
        });

    spawn_touch_controls(commands);
}

fn spawn_touch_controls(commands: &mut Commands) {
    let arrow = |direction: Direction| -> &'static str {
        match direction {
            Direction::Forward => "^",
            Direction::Back => "v",
            Direction::Left => "<",
            Direction::Right => ">",
        }
    };

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    right: Val::Px(24.0),
                    bottom: Val::Px(24.0),
                    display: Display::Grid,
                    grid_template_columns: RepeatedGridTrack::px(3, 64.0),
                    grid_template_rows: RepeatedGridTrack::px(2, 64.0),
                    column_gap: Val::Px(6.0),
                    row_gap: Val::Px(6.0),
                    ..default()
                },
                visibility: Visibility::Hidden,
                ..default()
            },
            HudPanel::TouchControls,
        ))
        .with_children(|grid| {
            // forward on top centre, the other three on the bottom row
            for (direction, column, row) in [
                (Direction::Forward, 2, 1),
                (Direction::Left, 1, 2),
                (Direction::Back, 2, 2),
                (Direction::Right, 3, 2),
            ] {
                grid.spawn((
                    ButtonBundle {
                        style: Style {
                            grid_column: GridPlacement::start(column),
                            grid_row: GridPlacement::start(row),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        background_color: Color::srgba(1.0, 1.0, 1.0, 0.25).into(),
                        border_radius: BorderRadius::all(Val::Px(8.0)),
                        ..default()
                    },
                    TouchControl(direction),
                ))
                .with_children(|b| {
                    b.spawn(label(arrow(direction), 32.0, Color::WHITE));
                });
            }
        });
}

/// Copy timer, score and button label from the game context.
#[allow(clippy::needless_pass_by_value)]
pub fn update_hud(ctx: Res<GameContext>, mut texts: Query<(&mut Text, &HudText)>) {
    for (mut text, kind) in &mut texts {
        let value = match kind {
            HudText::Timer => timer_text(ctx.session().remaining()),
            HudText::Score => score_text(ctx.session().score()),
            HudText::StartLabel => start_label(ctx.session().phase()).to_string(),
        };
        if text.sections[0].value != value {
            text.sections[0].value = value;
        }
    }
}

/// Show or hide panels when the session or device changes.
#[allow(clippy::needless_pass_by_value)]
pub fn update_session_ui(
    ctx: Res<GameContext>,
    settings: Res<Settings>,
    mut signals: EventReader<GameSignal>,
    mut panels: Query<(&mut Visibility, &HudPanel)>,
    mut initialised: Local<bool>,
) {
    let relevant = signals.read().any(|s| {
        matches!(s, GameSignal::SessionStarted | GameSignal::SessionEnded { .. } | GameSignal::TouchDetected)
    });
    if !relevant && *initialised && !settings.is_changed() {
        return;
    }
    *initialised = true;

    let touch = ctx.touch_detected() || settings.controls.always_show_touch_controls;
    for (mut visibility, panel) in &mut panels {
        *visibility = if panel_visible(*panel, ctx.session().phase(), touch) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_phase() {
        assert_eq!(start_label(SessionPhase::Idle), START_LABEL);
        assert_eq!(start_label(SessionPhase::Ended), RESTART_LABEL);
        assert_eq!(timer_text(42), "Time: 42s");
        assert_eq!(score_text(3), "Meat: 3");
    }

    #[test]
    fn panels_follow_phase() {
        use HudPanel::*;
        assert!(panel_visible(StartButton, SessionPhase::Idle, false));
        assert!(!panel_visible(StartButton, SessionPhase::Active, false));
        assert!(panel_visible(StartButton, SessionPhase::Ended, false));
        assert!(!panel_visible(GameOver, SessionPhase::Idle, false));
        assert!(panel_visible(GameOver, SessionPhase::Ended, false));
        assert!(!panel_visible(TouchControls, SessionPhase::Active, false));
        assert!(panel_visible(TouchControls, SessionPhase::Idle, true));
    }
}
