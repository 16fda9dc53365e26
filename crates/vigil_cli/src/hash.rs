//! `vigil hash`: replay a token sequence through the rolling hash.

use vigil_common::{format_hex32, XorHash32};

use crate::HashArgs;

/// Runs the `vigil hash` command, printing the state after each token.
pub fn run(args: &HashArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for line in states(args) {
        println!("{line}");
    }
    Ok(0)
}

fn states(args: &HashArgs) -> Vec<String> {
    let mut hasher = XorHash32::seeded(args.seed0, args.seed1);
    args.tokens
        .iter()
        .map(|&t| format_hex32(hasher.next(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tokens() {
        let args = HashArgs {
            seed0: 0,
            seed1: 0,
            tokens: vec![0xf000, 0xf001, 0xf002],
        };
        assert_eq!(states(&args), vec!["8f135919", "bc2a5400", "fdf89ab7"]);
    }

    #[test]
    fn zero_tokens() {
        let args = HashArgs {
            seed0: 0,
            seed1: 0,
            tokens: vec![0, 0, 0, 0],
        };
        assert_eq!(
            states(&args),
            vec!["510c4619", "e02e553e", "7bb98f3a", "0183a8b5"]
        );
    }
}
