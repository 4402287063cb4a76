use pyrite_nn::{train_loop, Network, TrainConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut network = Network::new(vec![2, 2, 1], 1.0, 0.5).expect("topology is valid");

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];

    println!("Training a [2, 2, 1] network as an XOR gate...");
    let config = TrainConfig::new(3000, 100);
    let final_mse = train_loop(&mut network, &inputs, &targets, &config);
    println!("final avg mse: {final_mse:.6}");

    println!("\n{network}");
    for input in &inputs {
        let output = network.run(input);
        println!("{:.0} {:.0} = {:.10}", input[0], input[1], output[0]);
    }
}
