// SPDX-License-Identifier: Apache-2.0
//! Research ladders, diplomatic actions, and espionage resolution.
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use ec4x_core::{
    advance_turn, DiplomaticAction, DiploState, EspionageAttempt, EspionageInvestment,
    EspionageKind, EventKind, OrderPacket, ResearchAllocation, ResearchLadder, SystemId,
};

#[test]
fn funded_allocation_advances_the_el_ladder() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::add_colony(&mut state, &config, SystemId(0), house, 10);

    // EL level 1 costs el_cost_base · 1; fund it exactly.
    let cost = u32::try_from(config.sections.tech.el_cost_base).unwrap();
    let mut packet = OrderPacket::empty(house, 1);
    packet.research = Some(ResearchAllocation {
        el: cost,
        sl: 0,
        fields: std::collections::BTreeMap::new(),
    });
    let outcome = advance_turn(&mut state, &config, &[packet]);

    let record = state.houses.get(house).unwrap();
    assert_eq!(record.tech.el, 1);
    assert_eq!(record.research.el, 0);
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::ResearchAdvanced { ladder: ResearchLadder::El, new_level: 1, .. }
    )));

    // The allocation stands next turn and keeps accumulating.
    advance_turn(&mut state, &config, &[]);
    let record = state.houses.get(house).unwrap();
    assert_eq!(record.tech.el, 1);
    assert_eq!(record.research.el, u64::from(cost));
}

#[test]
fn broke_houses_scale_their_research_down() {
    let config = common::config();
    let mut state = common::line_state(2);
    let house = common::add_house(&mut state, "House Alba");
    common::edit_house(&mut state, house, |record| record.treasury = 10);

    let mut packet = OrderPacket::empty(house, 1);
    packet.research = Some(ResearchAllocation {
        el: 100,
        sl: 0,
        fields: std::collections::BTreeMap::new(),
    });
    advance_turn(&mut state, &config, &[packet]);
    let record = state.houses.get(house).unwrap();
    // Only the affordable share was spent and banked.
    assert_eq!(record.research.el, 10);
    assert_eq!(record.treasury, 0);
}

#[test]
fn proposal_accept_changes_both_sides() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");

    let mut propose = OrderPacket::empty(alba, 1);
    propose.diplomacy.push(DiplomaticAction::Propose {
        to: boreas,
        state: DiploState::Allied,
    });
    advance_turn(&mut state, &config, &[propose]);
    assert_eq!(state.relation(alba, boreas), DiploState::Neutral);

    let mut accept = OrderPacket::empty(boreas, 2);
    accept.diplomacy.push(DiplomaticAction::Accept { from: alba });
    let outcome = advance_turn(&mut state, &config, &[accept]);
    assert_eq!(state.relation(alba, boreas), DiploState::Allied);
    assert_eq!(state.relation(boreas, alba), DiploState::Allied);
    assert!(outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::DiplomaticStateChanged { state: DiploState::Allied, .. }
    )));
}

#[test]
fn declaration_of_war_is_immediate_and_symmetric() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");

    let mut packet = OrderPacket::empty(alba, 1);
    packet.diplomacy.push(DiplomaticAction::Declare { on: boreas });
    advance_turn(&mut state, &config, &[packet]);
    assert_eq!(state.relation(alba, boreas), DiploState::Enemy);
    assert_eq!(state.relation(boreas, alba), DiploState::Enemy);
}

#[test]
fn espionage_attempt_resolves_once_with_capped_investment() {
    let config = common::config();
    let mut state = common::line_state(2);
    let alba = common::add_house(&mut state, "House Alba");
    let boreas = common::add_house(&mut state, "House Boreas");
    common::add_colony(&mut state, &config, SystemId(0), alba, 10);
    common::add_colony(&mut state, &config, SystemId(1), boreas, 10);

    let cap = config.sections.limits.espionage_detection_threshold;
    let mut packet = OrderPacket::empty(alba, 1);
    packet.espionage_investment = Some(EspionageInvestment {
        ebp: cap + 50,
        cip: 0,
    });
    packet.espionage_attempt = Some(EspionageAttempt {
        target: boreas,
        kind: EspionageKind::TechProbe,
    });
    let outcome = advance_turn(&mut state, &config, &[packet]);

    // Investment was capped at the detection threshold, then the attempt
    // consumed its share.
    let pool = state.houses.get(alba).unwrap().espionage.ebp;
    assert!(pool <= cap);
    let resolutions = outcome
        .events
        .iter()
        .filter(|event| matches!(event.kind, EventKind::EspionageResolved { .. }))
        .count();
    assert_eq!(resolutions, 1);

    // A successful probe lands the target's tech readout in intel.
    if outcome.events.iter().any(|event| matches!(
        event.kind,
        EventKind::EspionageResolved { success: true, .. }
    )) {
        let intel = &state.houses.get(alba).unwrap().intel;
        assert!(intel.known_enemy_tech.contains_key(&boreas));
    }
}
