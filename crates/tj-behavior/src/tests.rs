//! Unit tests for tj-behavior.

use std::sync::Arc;

use tj_core::{Action, AgentId, GridPosition, Heading, RouteIntent};
use tj_topology::JunctionTopology;

use crate::{
    ArbitrationConfig, ArbitrationEngine, CellObservation, CommunicationChannel, Driver,
    JunctionAgent, ObservationWindow, Policy,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(row: i32, col: i32) -> GridPosition {
    GridPosition::new(row, col)
}

fn topo() -> Arc<JunctionTopology> {
    Arc::new(JunctionTopology::standard(14).unwrap())
}

fn engine(policy: Policy) -> Arc<ArbitrationEngine> {
    Arc::new(ArbitrationEngine::new(topo(), ArbitrationConfig::with_policy(policy)))
}

/// Window of `size` centred on `center`, holding every agent of `scene`
/// that falls inside it.  Agent ids are scene indices.
fn window_around(center: GridPosition, size: usize, scene: &[(GridPosition, RouteIntent)]) -> ObservationWindow {
    let mut w = ObservationWindow::empty(size);
    let half = (size / 2) as i32;
    for (i, &(position, intent)) in scene.iter().enumerate() {
        let r = position.row - center.row + half;
        let c = position.col - center.col + half;
        if (0..size as i32).contains(&r) && (0..size as i32).contains(&c) {
            w.set(r as usize, c as usize, CellObservation {
                agent: Some(AgentId(i as u32)),
                position,
                intent: Some(intent),
            });
        }
    }
    w
}

fn agents(engine: &Arc<ArbitrationEngine>, n: usize) -> Vec<JunctionAgent> {
    (0..n).map(|i| JunctionAgent::new(AgentId(i as u32), Arc::clone(engine))).collect()
}

/// One full exchange-then-decide tick with agent `i` standing at `scene[i]`.
fn run_tick(
    drivers: &mut [JunctionAgent],
    scene:   &[(GridPosition, RouteIntent)],
    channel: &mut CommunicationChannel,
) -> Vec<Action> {
    for (d, &(position, _)) in drivers.iter_mut().zip(scene) {
        d.see(&window_around(position, 5, scene));
        d.update_moving_direction();
    }
    channel.register(drivers.iter().filter_map(|d| Some((d.id(), d.position()?, d.heading()))));
    for d in drivers.iter() {
        d.broadcast(channel);
    }
    for delivery in channel.take_inbox() {
        drivers[delivery.to.index()].receive_wait(delivery.claim);
    }
    let actions = drivers.iter_mut().map(|d| d.decide(channel).action).collect();
    for d in drivers.iter_mut() {
        d.end_tick();
    }
    channel.clear();
    actions
}

// ── Local observer ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observation {
    use super::*;
    use crate::{ObserveError, extract};

    #[test]
    fn unspawned_agent_gets_empty_view() {
        let w = window_around(p(5, 6), 5, &[(p(5, 6), RouteIntent::Forward)]);
        let view = extract(&w, None).unwrap();
        assert!(view.peers.is_empty());
        assert_eq!(view.self_intent, None);
    }

    #[test]
    fn peers_exclude_self() {
        let scene = [(p(5, 6), RouteIntent::TurnLeft), (p(7, 5), RouteIntent::Forward)];
        let view = extract(&window_around(p(5, 6), 5, &scene), Some(p(5, 6))).unwrap();
        assert_eq!(view.self_intent, Some(RouteIntent::TurnLeft));
        assert_eq!(view.peers.len(), 1);
        assert_eq!(view.peers[0].position, p(7, 5));
    }

    #[test]
    fn missing_self_is_an_error() {
        let w = ObservationWindow::empty(5);
        assert_eq!(extract(&w, Some(p(1, 1))), Err(ObserveError::MissingSelf(p(1, 1))));
    }

    #[test]
    fn even_window_rejected() {
        let w = ObservationWindow::empty(4);
        assert_eq!(extract(&w, None), Err(ObserveError::BadWindowSize(4)));
    }

    #[test]
    fn inconsistent_cell_count_rejected() {
        let w = ObservationWindow::from_cells(3, vec![None; 8]);
        assert!(matches!(extract(&w, None), Err(ObserveError::ShapeMismatch { expected: 9, got: 8 })));
    }

    #[test]
    fn from_features_decodes_cells() {
        // 3×3 window, 2 agents → stride 7.
        let mut f = vec![0.0_f32; 9 * 7];
        let centre = 4 * 7;
        f[centre + 1] = 1.0; // agent 1
        f[centre + 2] = 5.0;
        f[centre + 3] = 6.0;
        f[centre + 5] = 1.0; // turn right
        let w = ObservationWindow::from_features(3, 2, &f).unwrap();
        let c = w.center().unwrap();
        assert_eq!(c.agent, Some(AgentId(1)));
        assert_eq!(c.position, p(5, 6));
        assert_eq!(c.intent, Some(RouteIntent::TurnRight));
        assert_eq!(w.occupied().count(), 1);
    }

    #[test]
    fn from_features_shape_mismatch() {
        let err = ObservationWindow::from_features(3, 2, &[0.0; 10]).unwrap_err();
        assert_eq!(err, ObserveError::ShapeMismatch { expected: 63, got: 10 });
    }
}

// ── Communication channel ─────────────────────────────────────────────────────

#[cfg(test)]
mod channel {
    use tj_agent::WaitClaim;
    use tj_core::Axis;

    use super::*;

    #[test]
    fn query_registered_heading() {
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(0), p(5, 6), Some(Heading::South)), (AgentId(1), p(7, 5), None)]);
        assert_eq!(ch.query_heading(p(5, 6)), Some(Heading::South));
        assert_eq!(ch.query_heading(p(7, 5)), None);
        assert_eq!(ch.query_heading(p(0, 0)), None);
        assert_eq!(ch.agent_at(p(7, 5)), Some(AgentId(1)));
    }

    #[test]
    fn broadcast_to_empty_cell_is_not_an_error() {
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(0), p(5, 6), None)]);
        assert!(!ch.broadcast_wait(p(1, 1), WaitClaim::new(3, Axis::Vertical)));
        assert!(ch.take_inbox().is_empty());
    }

    #[test]
    fn inbox_sorted_by_recipient() {
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(2), p(1, 1), None), (AgentId(0), p(2, 2), None)]);
        ch.broadcast_wait(p(1, 1), WaitClaim::new(1, Axis::Vertical));
        ch.broadcast_wait(p(2, 2), WaitClaim::new(2, Axis::Vertical));
        ch.broadcast_wait(p(1, 1), WaitClaim::new(3, Axis::Horizontal));
        let inbox = ch.take_inbox();
        let order: Vec<_> = inbox.iter().map(|d| (d.to, d.claim.value)).collect();
        assert_eq!(order, vec![(AgentId(0), 2), (AgentId(2), 1), (AgentId(2), 3)]);
    }

    #[test]
    fn register_drops_previous_tick() {
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(0), p(5, 6), Some(Heading::South))]);
        ch.broadcast_wait(p(5, 6), WaitClaim::new(1, Axis::Vertical));
        ch.register([(AgentId(1), p(7, 5), Some(Heading::East))]);
        assert_eq!(ch.query_heading(p(5, 6)), None);
        assert!(ch.take_inbox().is_empty());
        ch.clear();
        assert!(ch.is_empty());
    }
}

// ── Arbitration rules ─────────────────────────────────────────────────────────

#[cfg(test)]
mod arbitration {
    use proptest::prelude::*;
    use tj_agent::WaitClaim;
    use tj_core::Axis;
    use tj_topology::JunctionTopologyBuilder;

    use super::*;
    use crate::{ArbitrationInput, Peer};

    fn peer(position: GridPosition, intent: RouteIntent) -> Peer {
        Peer { position, intent: Some(intent) }
    }

    fn input<'a>(position: GridPosition, heading: Heading, peers: &'a [Peer]) -> ArbitrationInput<'a> {
        ArbitrationInput { position, heading: Some(heading), intent: Some(RouteIntent::Forward), peers, claim: None }
    }

    #[test]
    fn interior_always_advances() {
        let e = engine(Policy::StaticOnly);
        let peers = [peer(p(7, 6), RouteIntent::Forward), peer(p(5, 6), RouteIntent::Forward)];
        let ch = CommunicationChannel::new();
        for cell in [p(6, 6), p(7, 6), p(7, 7), p(6, 7)] {
            assert_eq!(e.decide(&input(cell, Heading::South, &peers), &ch), Action::Advance);
        }
    }

    #[test]
    fn road_advances_when_next_cell_free() {
        let e = engine(Policy::StaticOnly);
        let peers = [peer(p(2, 6), RouteIntent::Forward)];
        let ch = CommunicationChannel::new();
        assert_eq!(e.decide(&input(p(3, 6), Heading::South, &peers), &ch), Action::Advance);
    }

    #[test]
    fn right_turn_occupant_does_not_block() {
        let e = engine(Policy::StaticOnly);
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(1), p(6, 6), Some(Heading::South))]);
        let peers = [peer(p(6, 6), RouteIntent::TurnRight)];
        let mut me = input(p(7, 5), Heading::East, &peers);
        me.intent = Some(RouteIntent::TurnRight);
        assert_eq!(e.decide(&me, &ch), Action::Advance);
    }

    #[test]
    fn occupant_leaving_junction_does_not_block() {
        let e = engine(Policy::StaticOnly);
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(1), p(7, 6), Some(Heading::South))]);
        let peers = [peer(p(7, 6), RouteIntent::Forward)];
        assert_eq!(e.decide(&input(p(8, 7), Heading::North, &peers), &ch), Action::Advance);
    }

    #[test]
    fn occupant_with_unknown_heading_is_skipped() {
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        let peers = [peer(p(6, 6), RouteIntent::Forward)];
        assert_eq!(e.decide(&input(p(7, 5), Heading::East, &peers), &ch), Action::Advance);
    }

    #[test]
    fn adjacent_approachers_admit_exactly_one() {
        let t = topo();
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        for i in 0..4 {
            let a = t.approach(i);
            let b = t.approach(JunctionTopology::cyclic_neighbor_right(i));
            let pa = [peer(b.position, RouteIntent::Forward)];
            let pb = [peer(a.position, RouteIntent::Forward)];
            let da = e.decide(&input(a.position, a.heading, &pa), &ch);
            let db = e.decide(&input(b.position, b.heading, &pb), &ch);
            let admitted = [da, db].iter().filter(|&&d| d == Action::Advance).count();
            assert_eq!(admitted, 1, "approaches {i} and {}", (i + 1) % 4);
        }
    }

    #[test]
    fn every_approach_pair_admits_exactly_one() {
        // Opposite approaches included; left turns keep both paths crossing.
        let t = topo();
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                let (a, b) = (t.approach(i), t.approach(j));
                let pa = [peer(b.position, RouteIntent::TurnLeft)];
                let pb = [peer(a.position, RouteIntent::TurnLeft)];
                let mut ia = input(a.position, a.heading, &pa);
                ia.intent = Some(RouteIntent::TurnLeft);
                let mut ib = input(b.position, b.heading, &pb);
                ib.intent = Some(RouteIntent::TurnLeft);
                let admitted = [e.decide(&ia, &ch), e.decide(&ib, &ch)]
                    .iter()
                    .filter(|&&d| d == Action::Advance)
                    .count();
                assert_eq!(admitted, 1, "approaches {i} and {j}");
            }
        }
    }

    #[test]
    fn occupied_max_priority_approach_holds_back_opposite() {
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        let from_north = [peer(p(5, 6), RouteIntent::Forward)];
        let from_south = [peer(p(8, 7), RouteIntent::Forward)];
        assert_eq!(e.decide(&input(p(8, 7), Heading::North, &from_north), &ch), Action::Yield);
        assert_eq!(e.decide(&input(p(5, 6), Heading::South, &from_south), &ch), Action::Advance);
    }

    #[test]
    fn every_peer_is_checked() {
        // Approach 2's right neighbour is listed after an irrelevant peer.
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        let peers = [peer(p(12, 7), RouteIntent::Forward), peer(p(6, 8), RouteIntent::Forward)];
        assert_eq!(e.decide(&input(p(8, 7), Heading::North, &peers), &ch), Action::Yield);
    }

    #[test]
    fn wait_claim_overrides_static_order() {
        let e = engine(Policy::StaticWithCommunication);
        let ch = CommunicationChannel::new();
        let horizontal = WaitClaim::new(5, Axis::Horizontal);

        // Static outcome: approach 0 advances, approach 1 yields.
        let p0 = [peer(p(7, 5), RouteIntent::Forward)];
        let p1 = [peer(p(5, 6), RouteIntent::Forward)];
        assert_eq!(e.decide(&input(p(5, 6), Heading::South, &p0), &ch), Action::Advance);
        assert_eq!(e.decide(&input(p(7, 5), Heading::East, &p1), &ch), Action::Yield);

        // Horizontal priority flips both.
        let mut v = input(p(5, 6), Heading::South, &p0);
        v.claim = Some(horizontal);
        let mut h = input(p(7, 5), Heading::East, &p1);
        h.claim = Some(horizontal);
        assert_eq!(e.decide(&v, &ch), Action::Yield);
        assert_eq!(e.decide(&h, &ch), Action::Advance);
    }

    #[test]
    fn static_policy_ignores_claims() {
        let e = engine(Policy::StaticOnly);
        let ch = CommunicationChannel::new();
        let p0 = [peer(p(7, 5), RouteIntent::Forward)];
        let mut v = input(p(5, 6), Heading::South, &p0);
        v.claim = Some(WaitClaim::new(9, Axis::Horizontal));
        assert_eq!(e.decide(&v, &ch), Action::Advance);
    }

    #[test]
    fn priority_axis_still_blocked_by_occupied_junction() {
        let e = engine(Policy::StaticWithCommunication);
        let mut ch = CommunicationChannel::new();
        ch.register([(AgentId(0), p(6, 6), Some(Heading::South))]);
        let peers = [peer(p(6, 6), RouteIntent::Forward)];
        let mut me = input(p(7, 5), Heading::East, &peers);
        me.claim = Some(WaitClaim::new(4, Axis::Horizontal));
        assert_eq!(e.decide(&me, &ch), Action::Yield);
    }

    /// The junction is placed far off so every in-grid cell is ordinary road.
    fn remote_engine() -> ArbitrationEngine {
        let c = 100;
        let t = JunctionTopologyBuilder::new()
            .approach(p(c - 1, c), Heading::South, 0)
            .approach(p(c + 1, c - 1), Heading::East, 1)
            .approach(p(c + 2, c + 1), Heading::North, 2)
            .approach(p(c, c + 2), Heading::West, 3)
            .interior(p(c, c), 0)
            .interior(p(c + 1, c), 1)
            .interior(p(c + 1, c + 1), 2)
            .interior(p(c, c + 1), 3)
            .build()
            .unwrap();
        ArbitrationEngine::new(Arc::new(t), ArbitrationConfig::default())
    }

    fn heading() -> impl Strategy<Value = Heading> {
        prop_oneof![Just(Heading::South), Just(Heading::East), Just(Heading::North), Just(Heading::West)]
    }

    proptest! {
        #[test]
        fn peer_in_next_cell_forces_yield(
            size in 3i32..40,
            row_frac in 0.0f64..1.0,
            col_frac in 0.0f64..1.0,
            h in heading(),
        ) {
            let e = remote_engine();
            let ch = CommunicationChannel::new();
            let me = p((row_frac * size as f64) as i32, (col_frac * size as f64) as i32);
            let peers = [peer(me.step(h), RouteIntent::Forward)];
            prop_assert_eq!(e.decide(&input(me, h, &peers), &ch), Action::Yield);
        }
    }
}

// ── Drivers end to end ────────────────────────────────────────────────────────

#[cfg(test)]
mod drivers {
    use super::*;
    use crate::{GreedyDriver, RandomDriver};

    const FWD: RouteIntent = RouteIntent::Forward;

    #[test]
    fn four_way_arrival_then_occupied_junction() {
        let e = engine(Policy::StaticOnly);
        let mut ds = agents(&e, 4);
        let mut ch = CommunicationChannel::new();

        let tick0 = [(p(5, 6), FWD), (p(7, 5), FWD), (p(8, 7), FWD), (p(6, 8), FWD)];
        let actions = run_tick(&mut ds, &tick0, &mut ch);
        assert_eq!(actions, vec![Action::Advance, Action::Yield, Action::Yield, Action::Yield]);

        let tick1 = [(p(6, 6), FWD), (p(7, 5), FWD), (p(8, 7), FWD), (p(6, 8), FWD)];
        let actions = run_tick(&mut ds, &tick1, &mut ch);
        assert_eq!(actions[0], Action::Advance);
        assert_eq!(actions[1], Action::Yield);
    }

    #[test]
    fn communicating_team_admits_the_claimed_axis() {
        // All waits are 0: the ties resolve to the vertical axis, so both
        // vertical approachers advance and both horizontal ones yield.
        let e = engine(Policy::StaticWithCommunication);
        let mut ds = agents(&e, 4);
        let mut ch = CommunicationChannel::new();
        let scene = [(p(5, 6), FWD), (p(7, 5), FWD), (p(8, 7), FWD), (p(6, 8), FWD)];
        let actions = run_tick(&mut ds, &scene, &mut ch);
        assert_eq!(actions, vec![Action::Advance, Action::Yield, Action::Advance, Action::Yield]);
    }

    #[test]
    fn longer_horizontal_wait_wins_priority() {
        let e = engine(Policy::StaticWithCommunication);
        let mut ds = agents(&e, 2);
        let mut ch = CommunicationChannel::new();

        // Agent 1 waits alone at the east-bound approach for three ticks.
        let lone = [(p(7, 5), FWD)];
        for _ in 0..3 {
            run_tick(&mut ds[1..], &lone, &mut ch);
        }
        assert_eq!(ds[1].perception().state().waiting_time(), 3);

        let scene = [(p(5, 6), FWD), (p(7, 5), FWD)];
        let actions = run_tick(&mut ds, &scene, &mut ch);
        assert_eq!(actions, vec![Action::Yield, Action::Advance]);
    }

    #[test]
    fn static_team_does_not_broadcast() {
        let e = engine(Policy::StaticOnly);
        let mut ds = agents(&e, 2);
        let scene = [(p(5, 6), FWD), (p(7, 5), FWD)];
        for (d, &(pos, _)) in ds.iter_mut().zip(&scene) {
            d.see(&window_around(pos, 5, &scene));
            d.update_moving_direction();
        }
        let mut ch = CommunicationChannel::new();
        ch.register(ds.iter().filter_map(|d| Some((d.id(), d.position()?, d.heading()))));
        for d in &ds {
            d.broadcast(&mut ch);
        }
        assert!(ch.take_inbox().is_empty());
    }

    #[test]
    fn unspawned_agent_advances() {
        let e = engine(Policy::StaticWithCommunication);
        let mut d = JunctionAgent::new(AgentId(0), e);
        d.see(&ObservationWindow::empty(5));
        d.update_moving_direction();
        let decision = d.decide(&CommunicationChannel::new());
        assert_eq!(decision.action, Action::Advance);
        assert_eq!(decision.wait_sample, None);
    }

    #[test]
    fn malformed_observation_advances() {
        let e = engine(Policy::StaticOnly);
        let mut d = JunctionAgent::new(AgentId(0), e);
        let scene = [(p(7, 5), FWD), (p(5, 6), FWD)];
        d.see(&window_around(p(7, 5), 5, &scene));
        d.update_moving_direction();
        d.see(&ObservationWindow::from_cells(5, vec![None; 3]));
        assert!(d.perception().is_malformed());
        assert_eq!(d.decide(&CommunicationChannel::new()).action, Action::Advance);
    }

    #[test]
    fn wait_sample_reported_on_entry() {
        let e = engine(Policy::StaticOnly);
        let mut ds = agents(&e, 1);
        let mut ch = CommunicationChannel::new();
        let mut samples = Vec::new();
        for cell in [p(4, 6), p(5, 6), p(6, 6), p(7, 6)] {
            let scene = [(cell, FWD)];
            ds[0].see(&window_around(cell, 5, &scene));
            ds[0].update_moving_direction();
            ch.register([(AgentId(0), cell, ds[0].heading())]);
            samples.push(ds[0].decide(&ch).wait_sample);
            ch.clear();
        }
        assert_eq!(samples, vec![None, None, Some(2), None]);
    }

    #[test]
    fn reset_episode_is_idempotent() {
        let e = engine(Policy::StaticWithCommunication);
        let mut ds = agents(&e, 2);
        let mut ch = CommunicationChannel::new();
        run_tick(&mut ds, &[(p(5, 6), FWD), (p(7, 5), FWD)], &mut ch);
        ds[0].reset_episode();
        let once = format!("{:?}", ds[0].perception());
        ds[0].reset_episode();
        assert_eq!(format!("{:?}", ds[0].perception()), once);
        assert_eq!(ds[0].position(), None);
        assert_eq!(ds[0].heading(), None);
    }

    #[test]
    fn greedy_always_advances() {
        let mut d = GreedyDriver::new(AgentId(0), topo());
        let scene = [(p(7, 5), FWD), (p(5, 6), FWD)];
        d.see(&window_around(p(7, 5), 5, &scene));
        d.update_moving_direction();
        assert_eq!(d.decide(&CommunicationChannel::new()).action, Action::Advance);
    }

    #[test]
    fn random_driver_is_deterministic_per_seed() {
        let draw = |seed| {
            let mut d = RandomDriver::new(AgentId(3), topo(), seed);
            (0..32).map(|_| d.decide(&CommunicationChannel::new()).action).collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
        let actions = draw(7);
        assert!(actions.contains(&Action::Advance) && actions.contains(&Action::Yield));
    }

    #[test]
    fn random_driver_restarts_its_stream_on_reset() {
        let ch = CommunicationChannel::new();
        let mut d = RandomDriver::new(AgentId(3), topo(), 11);
        let first: Vec<_> = (0..16).map(|_| d.decide(&ch).action).collect();
        d.reset_episode();
        let second: Vec<_> = (0..16).map(|_| d.decide(&ch).action).collect();
        assert_eq!(first, second);
    }
}
