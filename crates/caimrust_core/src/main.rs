use caimrust_core::{CaimConfig, CaimDiscretizer, NoProgress};
use std::fs;

fn main() {
    let mut fare: Vec<f64> = Vec::new();
    let mut survived: Vec<Option<String>> = Vec::new();
    let file =
        fs::read_to_string("resources/data.csv").expect("Something went wrong reading the file");
    for l in file.lines() {
        let mut split = l.split(",");
        fare.push(split.next().unwrap().parse::<f64>().unwrap());
        survived.push(Some(split.next().unwrap().to_string()));
    }
    let disc = CaimDiscretizer::new(CaimConfig::default());
    let column = disc.fit_column("fare", &fare, &survived, &NoProgress).unwrap();
    println!("cut points: {:?}", column.scheme.cut_points());
    println!("bins: {:?}", column.labels);
    println!("first rows: {:?}", &column.project(&fare)[..5]);
}
