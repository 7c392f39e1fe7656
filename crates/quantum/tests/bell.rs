use quantum::{gates::{cnot, hadamard}, Backend, CircuitBuilder};
use rng::ONDRng;

#[test]
fn bell_state_z_correlation() {
    let mut b = CircuitBuilder::new(2);
    b.place(hadamard(), &[0], "H").unwrap();
    b.place(cnot(), &[0, 1], "CX").unwrap();
    let bell = b.build();

    let mut counts = [0usize; 4];
    for shot in 0..100 {
        let mut rng = ONDRng::new(format!("seed-{}", shot).as_bytes());
        let m = Backend::Sampled { reps: 1 }.run(&bell, &[0, 1], &mut rng).unwrap();
        for (k, c) in m.counts.unwrap().into_iter().enumerate() {
            counts[k] += c;
        }
    }

    assert_eq!(counts[0b01], 0, "Found |01> in Bell state");
    assert_eq!(counts[0b10], 0, "Found |10> in Bell state");
    assert!(counts[0b00] > 0, "Never observed |00>, counts = {:?}", counts);
    assert!(counts[0b11] > 0, "Never observed |11>, counts = {:?}", counts);
}

#[test]
fn bell_state_exact_distribution() {
    let mut b = CircuitBuilder::new(2);
    b.place(hadamard(), &[0], "H").unwrap();
    b.place(cnot(), &[0, 1], "CX").unwrap();
    let mut rng = ONDRng::new(b"exact");

    let m = Backend::Exact.run(&b.build(), &[0, 1], &mut rng).unwrap();
    assert!(m.counts.is_none());
    assert!((m.probability(0b00) - 0.5).abs() < 1e-12, "{:?}", m.probabilities);
    assert!((m.probability(0b11) - 0.5).abs() < 1e-12, "{:?}", m.probabilities);
    assert_eq!(rng.steps(), 0);
}
