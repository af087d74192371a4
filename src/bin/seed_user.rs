//! Prints a ready-to-insert user document with a hashed `senha`, for seeding
//! the `usuario` collection by hand.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use serde_json::json;

fn main() {
    let mut args = std::env::args().skip(1);
    let (Some(nome), Some(email), Some(senha)) = (args.next(), args.next(), args.next()) else {
        eprintln!("Usage: seed_user <nome> <email> <senha>");
        std::process::exit(1);
    };

    let salt = SaltString::generate(&mut OsRng);
    let phc = match Argon2::default().hash_password(senha.as_bytes(), &salt) {
        Ok(phc) => phc.to_string(),
        Err(e) => {
            eprintln!("argon2 hash error: {e}");
            std::process::exit(1);
        }
    };

    let doc = json!({
        "nome": nome,
        "email": email,
        "senha": phc,
    });
    println!("{doc}");
}
