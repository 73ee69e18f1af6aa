use bdd_benchmark::bdd::Bdd;
use bdd_benchmark::manager::DiagramManager;
use bdd_benchmark::pigeonhole::{construct_php_cnf, pigeonhole, solve_cnf};
use bdd_benchmark::queens::{queens, queens_board};
use bdd_benchmark::stats::Stats;
use bdd_benchmark::tic_tac_toe::{lines, tic_tac_toe};
use num_bigint::BigUint;
use test_log::test;

#[test]
fn test_queens_counts() {
    let expected = [1u32, 0, 0, 2, 10, 4, 40];
    for (i, &count) in expected.iter().enumerate() {
        let n = i + 1;
        assert_eq!(queens::<Bdd>(n, &mut Stats::new()).unwrap(), BigUint::from(count), "n = {}", n);
    }
}

#[test]
fn test_queens_board_tracks_rows() {
    let n = 5;
    let mut mgr = <Bdd as DiagramManager>::new(n * n);
    let mut stats = Stats::tracking_sizes();
    let board = queens_board(&mut mgr, n, &mut stats).unwrap();

    assert_eq!(stats.checkpoints.len(), n);
    assert_eq!(stats.checkpoints.last().map(|c| c.nodes), Some(mgr.nodecount(board)));
}

#[test]
fn test_tic_tac_toe_lines() {
    assert_eq!(lines().len(), 76);
}

#[test]
fn test_tic_tac_toe_extremes() {
    // All noughts or all crosses: every line is held by one player.
    for crosses in [0, 64] {
        let outcome = tic_tac_toe::<Bdd>(crosses, &mut Stats::new()).unwrap();
        assert_eq!(outcome.solutions, BigUint::ZERO, "crosses = {}", crosses);
    }
}

#[test]
fn test_tic_tac_toe_few_crosses() {
    // With fewer than 16 crosses the 16 vertical lines cannot all be mixed.
    let outcome = tic_tac_toe::<Bdd>(8, &mut Stats::new()).unwrap();
    assert_eq!(outcome.solutions, BigUint::ZERO);
    assert!(outcome.largest >= outcome.init_nodes);
}

#[test]
#[ignore = "peaks at about two million nodes; run with --release -- --ignored"]
fn test_tic_tac_toe_twenty_crosses() {
    let outcome = tic_tac_toe::<Bdd>(20, &mut Stats::new()).unwrap();
    assert_eq!(outcome.solutions, BigUint::from(304u32));
    assert!(outcome.largest > outcome.final_nodes);
}

#[test]
fn test_pigeonhole() {
    let unsat = pigeonhole::<Bdd>(4, 3, &mut Stats::new()).unwrap();
    assert!(!unsat.satisfiable);
    assert_eq!(unsat.variables, 12);
    assert_eq!(unsat.clauses, 4 + 3 * 6);
    assert_eq!(unsat.final_nodes, 1);

    let sat = pigeonhole::<Bdd>(3, 3, &mut Stats::new()).unwrap();
    assert!(sat.satisfiable);

    let no_holes = pigeonhole::<Bdd>(1, 0, &mut Stats::new()).unwrap();
    assert!(!no_holes.satisfiable);
}

#[test]
fn test_solve_cnf_records_steps() {
    let cnf = construct_php_cnf(3, 3);
    let mut mgr = <Bdd as DiagramManager>::new(9);
    let mut stats = Stats::tracking_sizes();

    let solution = solve_cnf(&mut mgr, &cnf, &mut stats).unwrap();
    assert_eq!(solution.result, mgr.top());
    assert_eq!(stats.checkpoints.len(), cnf.len());
    assert!(solution.largest >= 1);
}
