//! terraform-validator CLI: validate Terraform plans against policy constraints.

use terraform_validator::cli;
use terraform_validator::collab::Collaborators;
use terraform_validator::convert::PlanConverter;
use terraform_validator::policy::ConstraintLibrary;

fn main() {
    let converter = PlanConverter::new();
    let engine = ConstraintLibrary::new();
    let collab = Collaborators {
        converter: &converter,
        engine: &engine,
        catalog: &converter,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::execute(std::env::args_os(), &collab, &mut out) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
