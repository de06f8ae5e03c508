use station_defender_core::{Command, Event, ItemKind, Outcome, Point, UnitId};
use station_defender_system_builder::{Builder, BuilderInput};

fn click_at(point: Point) -> BuilderInput {
    BuilderInput {
        confirm_action: true,
        cursor: Some(point),
        ..BuilderInput::default()
    }
}

#[test]
fn confirm_places_the_selected_item() {
    let mut builder = Builder::new(vec![ItemKind::Weapon, ItemKind::Mine]);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput {
            select_slot: Some(1),
            ..click_at(Point::new(250.0, 170.0))
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceItem {
            item: ItemKind::Mine,
            at: Point::new(250.0, 170.0),
        }],
        "builder should emit a placement for the freshly selected slot",
    );
    assert_eq!(builder.selected_item(), Some(ItemKind::Mine));
}

#[test]
fn confirm_without_selection_is_ignored() {
    let mut builder = Builder::new(vec![ItemKind::Weapon]);
    let mut commands = Vec::new();

    builder.handle(&[], click_at(Point::new(250.0, 170.0)), |_| None, &mut commands);

    assert!(commands.is_empty(), "nothing selected, nothing placed");
}

#[test]
fn out_of_range_slot_keeps_the_previous_selection() {
    let mut builder = Builder::new(vec![ItemKind::Weapon]);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput {
            select_slot: Some(0),
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );
    builder.handle(
        &[],
        BuilderInput {
            select_slot: Some(7),
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(builder.selected_item(), Some(ItemKind::Weapon));
    assert!(commands.is_empty());
}

#[test]
fn credits_are_never_placed() {
    let mut builder = Builder::new(vec![ItemKind::Credit]);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput {
            select_slot: Some(0),
            ..click_at(Point::new(250.0, 170.0))
        },
        |_| None,
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn upgrade_targets_the_hovered_weapon() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let mut probed = Vec::new();

    builder.handle(
        &[],
        BuilderInput {
            upgrade_action: true,
            cursor: Some(Point::new(150.0, 170.0)),
            ..BuilderInput::default()
        },
        |point| {
            probed.push(point);
            Some(UnitId::new(3))
        },
        &mut commands,
    );

    assert_eq!(probed, vec![Point::new(150.0, 170.0)]);
    assert_eq!(
        commands,
        vec![Command::UpgradeWeapon {
            unit: UnitId::new(3)
        }]
    );
}

#[test]
fn game_over_disables_the_builder() {
    let mut builder = Builder::new(vec![ItemKind::Weapon]);
    let mut commands = Vec::new();

    builder.handle(
        &[Event::GameOver {
            outcome: Outcome::Lost,
        }],
        BuilderInput {
            select_slot: Some(0),
            upgrade_action: true,
            ..click_at(Point::new(250.0, 170.0))
        },
        |_| Some(UnitId::new(1)),
        &mut commands,
    );

    assert!(commands.is_empty(), "no commands after the match is decided");
}
