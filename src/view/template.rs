use super::core::{ViewError, ViewModel, ViewRenderer};
use minijinja::{Environment, ErrorKind};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Map a view script name onto a file below `base_dir`, refusing anything
/// that is not a plain relative path.
fn map_path(base_dir: &Path, script: &str) -> Option<PathBuf> {
    if script.is_empty() {
        return None;
    }
    let mut pb = base_dir.to_path_buf();
    for comp in Path::new(script).components() {
        match comp {
            Component::Normal(s) => pb.push(s),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(pb)
}

/// minijinja renderer reading `<views_dir>/<script>.<extension>`.
///
/// Templates are loaded lazily and cached by the environment, so
/// `{% extends %}` and `{% include %}` resolve against the same directory.
pub struct TemplateRenderer {
    env: Environment<'static>,
    base_dir: PathBuf,
    extension: String,
}

impl TemplateRenderer {
    pub fn new<P: Into<PathBuf>>(base_dir: P, extension: &str) -> Self {
        let base_dir = base_dir.into();
        let extension = extension.trim_start_matches('.').to_string();

        let mut env = Environment::new();
        let loader_dir = base_dir.clone();
        env.set_loader(move |name| {
            let Some(path) = map_path(&loader_dir, name) else {
                return Ok(None);
            };
            match fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(e)),
            }
        });

        Self {
            env,
            base_dir,
            extension,
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn template_name(&self, script: &str) -> String {
        if self.extension.is_empty() {
            script.to_string()
        } else {
            format!("{}.{}", script, self.extension)
        }
    }
}

impl ViewRenderer for TemplateRenderer {
    fn render(&self, script: &str, model: &ViewModel) -> Result<String, ViewError> {
        let name = self.template_name(script);
        if map_path(&self.base_dir, &name).is_none() {
            return Err(ViewError::InvalidTemplatePath {
                name: script.to_string(),
            });
        }
        let template = self.env.get_template(&name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ViewError::TemplateNotFound {
                name: script.to_string(),
            },
            _ => ViewError::Render {
                name: script.to_string(),
                message: e.to_string(),
            },
        })?;
        template.render(model).map_err(|e| ViewError::Render {
            name: script.to_string(),
            message: e.to_string(),
        })
    }
}
