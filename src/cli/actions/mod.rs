pub mod plan;

#[derive(Debug)]
pub enum Action {
    Plan(plan::Args),
}
