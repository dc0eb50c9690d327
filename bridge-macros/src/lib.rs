
use proc_macro::TokenStream;

/// Runs the annotated test once per RNG seed, handing it a freshly built `Network`.
///
/// The test function must take a single `Network` argument. Seeds come from `BRIDGE_TEST_RNG_SEED` (one specific
/// seed) or `BRIDGE_TEST_SAMPLES` (run seeds `0..n`); by default a single run with seed 0 is performed.
#[proc_macro_attribute]
pub fn test(args: TokenStream, item: TokenStream) -> TokenStream {
    test::test_macro(args.into(), item.into()).into()
}
