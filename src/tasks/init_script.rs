//! Login-shell snippets that switch `HOME` to the per-host home.
use std::path::Path;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::ProvisionError;
use crate::exec::find_executable;
use crate::resources::fs::format_timestamp;

/// Quote `raw` for a single-quoted POSIX sh or csh word.
fn single_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Render the POSIX sh snippet.
///
/// `program` must be absolute; `stamp` ends up in the header comment.
#[must_use]
pub fn render_sh(program: &Path, stamp: &str) -> String {
    let program = single_quote(&program.to_string_lossy());
    format!(
        r#"#
# This script was generated on {stamp}
#
# Source it from your login shell: . "$HOME/.multihome/init.sh"
#

MULTIHOME={program}
if [ -x "$MULTIHOME" ]; then
    HOME_NEW="$("$MULTIHOME")"
    if [ -n "$HOME_NEW" ] && [ "$HOME_NEW" != "$HOME" ]; then
        HOME_OLD="$HOME"
        HOME="$HOME_NEW"
        export HOME_OLD HOME
        cd "$HOME" || true
    fi
    unset HOME_NEW
fi
unset MULTIHOME
"#
    )
}

/// Render the csh snippet.
#[must_use]
pub fn render_csh(program: &Path, stamp: &str) -> String {
    let program = single_quote(&program.to_string_lossy());
    format!(
        r#"#
# This script was generated on {stamp}
#
# Source it from your login shell: source "$HOME/.multihome/init.csh"
#

set MULTIHOME={program}
if ( -x "$MULTIHOME" ) then
    set HOME_NEW=`"$MULTIHOME"`
    if ( "$HOME_NEW" != "" && "$HOME_NEW" != "$HOME" ) then
        setenv HOME_OLD "$HOME"
        setenv HOME "$HOME_NEW"
        cd "$HOME"
    endif
    unset HOME_NEW
endif
unset MULTIHOME
"#
    )
}

/// Write `init.sh` and `init.csh` next to the other config files.
#[derive(Debug)]
pub struct GenerateInitScripts;

impl Task for GenerateInitScripts {
    fn name(&self) -> &'static str {
        "Generate init scripts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.script
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let program = find_executable(&ctx.entry_point).ok_or_else(|| {
            ProvisionError::SelfLookup(ctx.entry_point.to_string_lossy().into_owned())
        })?;
        let stamp = format_timestamp(&chrono::Local::now());
        ctx.log
            .debug(&format!("program path: {}", program.display()));

        let scripts = [
            (&ctx.paths.init_sh, render_sh(&program, &stamp)),
            (&ctx.paths.init_csh, render_csh(&program, &stamp)),
        ];
        for (path, body) in scripts {
            std::fs::write(path, body).map_err(|source| ProvisionError::WriteScript {
                path: path.clone(),
                source,
            })?;
            ctx.log.info(&format!("wrote {}", path.display()));
        }
        Ok(TaskResult::Ok)
    }
}
