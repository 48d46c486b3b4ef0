use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

/// Runs an async test body on the runtime shared by every test in the binary
/// (`test_utils::rt()`), so clients and mock backends can be reused across tests.
#[proc_macro_attribute]
pub fn shared_test_runtime(_attr: TokenStream, input: TokenStream) -> TokenStream {
	let input_fn = parse_macro_input!(input as ItemFn);

	if input_fn.sig.asyncness.is_none() {
		return syn::Error::new_spanned(
			input_fn.sig.fn_token,
			"#[shared_test_runtime] expects an async fn",
		)
		.to_compile_error()
		.into();
	}

	let fn_attrs = &input_fn.attrs;
	let fn_vis = &input_fn.vis;
	let fn_name = &input_fn.sig.ident;
	let fn_generics = &input_fn.sig.generics;
	let fn_inputs = &input_fn.sig.inputs;
	let fn_output = &input_fn.sig.output;
	let fn_block = &input_fn.block;

	// Remove async from the signature and wrap the body
	let result = quote! {
		#[test]
		#(#fn_attrs)*
		#fn_vis fn #fn_name #fn_generics(#fn_inputs) #fn_output {
			test_utils::rt().block_on(async #fn_block)
		}
	};

	result.into()
}
