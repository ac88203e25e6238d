mod parse;
pub use parse::Parse;

mod list;
pub use list::List;

use prople_pocket_core::credential::Credential;
use prople_pocket_core::proof::Proof;

pub(crate) fn print_credential(credential: &Credential, proof: &Proof) {
    println!("credential {}", credential.said().as_str());
    println!("  version  {}", credential.version().render());
    println!("  issuer   {}", credential.issuer().as_str());
    println!("  subject  {}", credential.subject().as_str());
    println!("  schema   {}", credential.schema().as_str());
    println!(
        "  seal     {} sn={} {}",
        proof.prefixer().qb64(),
        proof.seqner().sn(),
        proof.diger().qb64()
    );

    for siger in proof.sigers() {
        println!("  sig[{}]   {}", siger.index(), siger.qb64());
    }
}
