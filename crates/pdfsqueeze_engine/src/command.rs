use std::ffi::OsString;
use std::path::Path;

use pdfsqueeze_core::Preset;

pub const COMPATIBILITY_LEVEL: &str = "1.4";

/// Fixed Ghostscript argument list. Only the preset and the two generated
/// paths vary; nothing user-supplied is interpolated.
pub fn ghostscript_args(preset: Preset, input: &Path, output: &Path) -> Vec<OsString> {
    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(output.as_os_str());

    vec![
        OsString::from("-sDEVICE=pdfwrite"),
        OsString::from(format!("-dCompatibilityLevel={COMPATIBILITY_LEVEL}")),
        OsString::from(format!("-dPDFSETTINGS=/{}", preset.token())),
        OsString::from("-dNOPAUSE"),
        OsString::from("-dQUIET"),
        OsString::from("-dBATCH"),
        output_flag,
        input.as_os_str().to_owned(),
    ]
}
