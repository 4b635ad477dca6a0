#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Conversion is total: any input yields output, never a panic.
        let result = html2typst::convert_with_options(s, &html2typst::ConvertOptions::default());
        let _ = result.value.len();
    }
});
