use cellbench_core::Chemistry;

pub fn run() {
    println!(
        "{:<8} {:>8} {:>8} {:>8}  Color",
        "Type", "Nominal", "Min", "Max"
    );
    println!("{}", "-".repeat(44));
    for chem in Chemistry::ALL {
        let p = chem.profile();
        println!(
            "{:<8} {:>7.1}V {:>7.1}V {:>7.1}V  {}",
            p.name, p.nominal_voltage, p.min_voltage, p.max_voltage, p.color
        );
    }
}
