//! Integration tests for the event policy: which host events end grace,
//! and how damage is intercepted.

use respite_grace::{GraceConfig, GracePolicy, GraceTracker};
use respite_protocol::{
    BlockTarget, ClickAction, EndReason, Entity, HostEvent, Material, NoticeKind, PlayerId,
    Verdict,
};

// =========================================================================
// Helpers
// =========================================================================

const A: PlayerId = PlayerId(1);
const B: PlayerId = PlayerId(2);

fn policy() -> GracePolicy {
    GracePolicy::new(GraceTracker::new(GraceConfig::with_duration_secs(30)))
}

fn in_grace(players: &[PlayerId]) -> GracePolicy {
    let mut p = policy();
    for player in players {
        p.on_respawn(*player);
    }
    p
}

fn chest() -> BlockTarget {
    BlockTarget {
        material: Material::Other,
        has_inventory: true,
    }
}

fn plain_block() -> BlockTarget {
    BlockTarget {
        material: Material::Other,
        has_inventory: false,
    }
}

fn right_click(player: PlayerId, block: Option<BlockTarget>, block_in_hand: bool) -> HostEvent {
    HostEvent::BlockInteract {
        player,
        action: ClickAction::RightClickBlock,
        block,
        block_in_hand,
    }
}

// =========================================================================
// Building
// =========================================================================

#[test]
fn test_block_place_ends_grace() {
    let mut p = in_grace(&[A]);
    let outcome = p.handle(&HostEvent::BlockPlace { player: A });
    assert!(!p.tracker().is_active(A));
    assert_eq!(
        outcome.notices[0].kind,
        NoticeKind::Revoked {
            reason: EndReason::BlockPlace
        }
    );
}

#[test]
fn test_block_break_ends_grace() {
    let mut p = in_grace(&[A]);
    let outcome = p.handle(&HostEvent::BlockBreak { player: A });
    assert!(!p.tracker().is_active(A));
    assert_eq!(outcome.verdict, Verdict::Allow);
    assert_eq!(outcome.notices.len(), 1);
}

#[test]
fn test_building_without_grace_produces_nothing() {
    let mut p = policy();
    assert!(p.handle(&HostEvent::BlockBreak { player: A }).notices.is_empty());
}

// =========================================================================
// Interactions
// =========================================================================

#[test]
fn test_opening_container_ends_grace() {
    let mut p = in_grace(&[A]);
    let outcome = p.handle(&right_click(A, Some(chest()), false));
    assert!(!p.tracker().is_active(A));
    assert_eq!(
        outcome.notices[0].kind,
        NoticeKind::Revoked {
            reason: EndReason::BlockInteract
        }
    );
}

#[test]
fn test_every_anvil_wear_ends_grace() {
    for material in [Material::Anvil, Material::ChippedAnvil, Material::DamagedAnvil] {
        let mut p = in_grace(&[A]);
        let anvil = BlockTarget {
            material,
            has_inventory: false,
        };
        p.handle(&right_click(A, Some(anvil), false));
        assert!(!p.tracker().is_active(A), "{material:?} should end grace");
    }
}

#[test]
fn test_plain_block_click_keeps_grace() {
    let mut p = in_grace(&[A]);
    let outcome = p.handle(&right_click(A, Some(plain_block()), false));
    assert!(p.tracker().is_active(A));
    assert!(outcome.notices.is_empty());
}

#[test]
fn test_click_with_block_in_hand_keeps_grace() {
    let mut p = in_grace(&[A]);
    p.handle(&right_click(A, Some(chest()), true));
    assert!(p.tracker().is_active(A));
}

#[test]
fn test_click_in_air_keeps_grace() {
    let mut p = in_grace(&[A]);
    p.handle(&HostEvent::BlockInteract {
        player: A,
        action: ClickAction::RightClickAir,
        block: None,
        block_in_hand: false,
    });
    assert!(p.tracker().is_active(A));
}

#[test]
fn test_entity_with_inventory_ends_grace() {
    let mut p = in_grace(&[A]);
    p.handle(&HostEvent::EntityInteract {
        player: A,
        target_has_inventory: true,
    });
    assert!(!p.tracker().is_active(A));
}

#[test]
fn test_entity_without_inventory_keeps_grace() {
    let mut p = in_grace(&[A]);
    p.handle(&HostEvent::EntityInteract {
        player: A,
        target_has_inventory: false,
    });
    assert!(p.tracker().is_active(A));
}

// =========================================================================
// Damage
// =========================================================================

#[test]
fn test_environmental_damage_to_protected_player_is_cancelled() {
    let mut p = in_grace(&[A]);
    p.tracker_mut().advance(100); // 5 seconds

    let outcome = p.handle(&HostEvent::Damage {
        victim: Entity::Player(A),
        attacker: None,
    });
    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert!(p.tracker().is_active(A), "victim keeps grace");
    assert_eq!(
        outcome.notices[0].kind,
        NoticeKind::Protected { remaining_secs: 25 }
    );
}

#[test]
fn test_damage_to_unprotected_player_is_allowed() {
    let mut p = policy();
    let outcome = p.on_damage(Entity::Player(A), Some(Entity::Other));
    assert_eq!(outcome.verdict, Verdict::Allow);
    assert!(outcome.notices.is_empty());
}

#[test]
fn test_damage_to_non_player_is_allowed() {
    let mut p = policy();
    let outcome = p.on_damage(Entity::Other, Some(Entity::Player(A)));
    assert_eq!(outcome.verdict, Verdict::Allow);
}

#[test]
fn test_attacker_is_told_target_is_protected() {
    let mut p = in_grace(&[A]);
    let outcome = p.on_damage(Entity::Player(A), Some(Entity::Player(B)));
    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert!(outcome
        .notices
        .iter()
        .any(|n| n.player == B && n.kind == NoticeKind::TargetProtected));
}

#[test]
fn test_attacker_in_grace_loses_it_even_when_target_is_unprotected() {
    let mut p = in_grace(&[B]);
    let outcome = p.on_damage(Entity::Player(A), Some(Entity::Player(B)));

    assert!(!p.tracker().is_active(B));
    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(
        outcome.notices[0].kind,
        NoticeKind::Revoked {
            reason: EndReason::Attack
        }
    );
}

#[test]
fn test_attacking_a_mob_revokes_grace() {
    let mut p = in_grace(&[B]);
    p.on_damage(Entity::Other, Some(Entity::Player(B)));
    assert!(!p.tracker().is_active(B));
}

#[test]
fn test_both_in_grace_is_asymmetric() {
    let mut p = in_grace(&[A, B]);
    let outcome = p.on_damage(Entity::Player(A), Some(Entity::Player(B)));

    assert_eq!(outcome.verdict, Verdict::Cancel);
    assert!(p.tracker().is_active(A), "victim keeps grace");
    assert!(!p.tracker().is_active(B), "attacker loses grace");

    let kinds: Vec<(PlayerId, NoticeKind)> =
        outcome.notices.into_iter().map(|n| (n.player, n.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (A, NoticeKind::Protected { remaining_secs: 30 }),
            (B, NoticeKind::TargetProtected),
            (
                B,
                NoticeKind::Revoked {
                    reason: EndReason::Attack
                }
            ),
        ]
    );
}

#[test]
fn test_revoked_attacker_timer_does_not_fire_later() {
    let mut p = in_grace(&[B]);
    p.on_damage(Entity::Other, Some(Entity::Player(B)));
    let notices = p.tracker_mut().advance(20 * 60);
    assert!(notices.is_empty());
}
