use super::ArgReader;
use crate::annotation::MetadataReader;
use crate::error::Result;
use crate::model::{
    Annotation, AnnotationKind, AnnotationSet, ClassDecl, EndpointCollection, EndpointRecord, Verb,
};
use tracing::debug;

/// Resource actions in registration order: action, verbs, path suffix.
/// `{param}` is replaced by the resource parameter name.
const RESOURCE_ACTIONS: [(&str, &[Verb], &str); 7] = [
    ("index", &[Verb::Get], ""),
    ("create", &[Verb::Get], "/create"),
    ("store", &[Verb::Post], ""),
    ("show", &[Verb::Get], "/{param}"),
    ("edit", &[Verb::Get], "/{param}/edit"),
    ("update", &[Verb::Put, Verb::Patch], "/{param}"),
    ("destroy", &[Verb::Delete], "/{param}"),
];

/// Joins a prefix and a path with exactly one `/` between them. An empty
/// prefix leaves the path as it is.
pub fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.to_string();
    }
    let tail = path.trim_start_matches('/');
    if tail.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, tail)
    }
}

/// Reads and resolves classes into one endpoint collection.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    reader: MetadataReader,
}

impl RouteResolver {
    pub fn new(reader: MetadataReader) -> Self {
        Self { reader }
    }

    /// Endpoints of all classes, class order first, then the order each
    /// class establishes.
    pub fn endpoints(&self, classes: &[ClassDecl]) -> Result<EndpointCollection> {
        let mut endpoints = EndpointCollection::new();
        for class in classes {
            let annotations = self.reader.read(class)?;
            endpoints = endpoints.merge(endpoints_for_class(class, &annotations)?);
        }
        Ok(endpoints)
    }
}

/// Resolves one class: method-level route annotations create records in
/// method order, then class-level annotations are folded over the whole
/// collection in declaration order.
pub fn endpoints_for_class(class: &ClassDecl, set: &AnnotationSet) -> Result<EndpointCollection> {
    let mut endpoints = EndpointCollection::new();

    for (method, annotations) in &set.methods {
        for record in method_endpoints(class, method, annotations)? {
            endpoints.push(record);
        }
    }

    let endpoints = set
        .class
        .iter()
        .try_fold(endpoints, |endpoints, annotation| {
            apply_class_annotation(class, endpoints, annotation)
        })?;

    debug!("{} resolves to {} endpoints", class.name, endpoints.len());
    Ok(endpoints)
}

fn method_endpoints(
    class: &ClassDecl,
    method: &str,
    annotations: &[Annotation],
) -> Result<Vec<EndpointRecord>> {
    let mut records = Vec::new();
    let mut modifiers = Vec::new();

    for annotation in annotations {
        match &annotation.kind {
            AnnotationKind::Route(verb) => {
                records.push(route_record(class, method, *verb, annotation)?);
            }
            AnnotationKind::Middleware | AnnotationKind::Where => modifiers.push(annotation),
            other => debug!(
                "Ignoring {:?} on {}::{}: not a method-level annotation",
                other, class.name, method
            ),
        }
    }

    // Modifiers cover every route of the method, wherever they are declared.
    for annotation in modifiers {
        let args = ArgReader::new(class, Some(method), annotation);
        match annotation.kind {
            AnnotationKind::Middleware => {
                let middleware = args.value_list()?;
                for record in &mut records {
                    record.middleware.extend(middleware.iter().cloned());
                }
            }
            AnnotationKind::Where => {
                let wheres = args.value_or_named_map()?;
                for record in &mut records {
                    for (param, pattern) in &wheres {
                        record.wheres.insert(param.clone(), pattern.clone());
                    }
                }
            }
            _ => {}
        }
    }

    Ok(records)
}

fn route_record(
    class: &ClassDecl,
    method: &str,
    verb: Verb,
    annotation: &Annotation,
) -> Result<EndpointRecord> {
    let args = ArgReader::new(class, Some(method), annotation);

    let mut record = EndpointRecord::new(&class.name, method, vec![verb], args.required_value_str("path")?);
    record.name = args.optional_str("as")?;
    record.middleware = args.optional_list("middleware")?;
    record.wheres = args.optional_map("where")?;
    record.domain = args.optional_str("domain")?;
    Ok(record)
}

fn apply_class_annotation(
    class: &ClassDecl,
    endpoints: EndpointCollection,
    annotation: &Annotation,
) -> Result<EndpointCollection> {
    let args = ArgReader::new(class, None, annotation);

    let endpoints = match &annotation.kind {
        AnnotationKind::Prefix => {
            let prefix = args.required_value_str("prefix")?;
            endpoints.map(|mut record| {
                record.path = join_path(&prefix, &record.path);
                record
            })
        }
        AnnotationKind::Controller => {
            let prefix = match annotation.args.value() {
                Some(_) => Some(args.required_value_str("prefix")?),
                None => args.optional_str("prefix")?,
            };
            let domain = args.optional_str("domain")?;
            endpoints.map(|mut record| {
                if let Some(prefix) = &prefix {
                    record.path = join_path(prefix, &record.path);
                }
                fill_domain(&mut record, domain.as_deref());
                record
            })
        }
        AnnotationKind::Group => {
            let prefix = args.optional_str("prefix")?;
            let name_prefix = args.optional_str("as")?;
            let middleware = args.optional_list("middleware")?;
            let domain = args.optional_str("domain")?;
            let wheres = args.optional_map("where")?;
            endpoints.map(|mut record| {
                if let Some(prefix) = &prefix {
                    record.path = join_path(prefix, &record.path);
                }
                if let (Some(name_prefix), Some(name)) = (&name_prefix, &record.name) {
                    record.name = Some(format!("{}{}", name_prefix, name));
                }
                record.class_middleware.extend(middleware.iter().cloned());
                fill_domain(&mut record, domain.as_deref());
                for (param, pattern) in &wheres {
                    record
                        .wheres
                        .entry(param.clone())
                        .or_insert_with(|| pattern.clone());
                }
                record
            })
        }
        AnnotationKind::Middleware => {
            let middleware = args.value_list()?;
            let only = args.optional_list("only")?;
            let except = args.optional_list("except")?;
            endpoints.map(|mut record| {
                let included = only.is_empty() || only.contains(&record.method);
                let excluded = except.contains(&record.method);
                if included && !excluded {
                    record.class_middleware.extend(middleware.iter().cloned());
                }
                record
            })
        }
        AnnotationKind::Where => {
            let wheres = args.value_or_named_map()?;
            endpoints.map(|mut record| {
                for (param, pattern) in &wheres {
                    record
                        .wheres
                        .entry(param.clone())
                        .or_insert_with(|| pattern.clone());
                }
                record
            })
        }
        AnnotationKind::Resource => {
            let mut endpoints = endpoints;
            for record in resource_endpoints(class, &args)? {
                endpoints.push(record);
            }
            endpoints
        }
        other => {
            debug!(
                "Ignoring {:?} on class {}: not a class-level annotation",
                other, class.name
            );
            endpoints
        }
    };

    Ok(endpoints)
}

fn fill_domain(record: &mut EndpointRecord, domain: Option<&str>) {
    if record.domain.is_none() {
        record.domain = domain.map(str::to_string);
    }
}

/// Base path and parameter of a resource name. Every dotted segment but
/// the last is a parent and is followed by its own parameter:
/// `photos.comments` is `/photos/{photos}/comments` with `comments`.
fn resource_base(name: &str) -> (String, String) {
    let param_of = |segment: &str| segment.rsplit('/').next().unwrap_or(segment).to_string();

    let mut segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
    let last = segments.pop().unwrap_or(name);

    let mut base = String::new();
    for parent in segments {
        base.push_str(&format!("/{}/{{{}}}", parent, param_of(parent)));
    }
    base.push('/');
    base.push_str(last);
    (base, param_of(last))
}

fn resource_endpoints(class: &ClassDecl, args: &ArgReader<'_>) -> Result<Vec<EndpointRecord>> {
    let name = args.required_value_str("name")?;
    let only = args.optional_list("only")?;
    let except = args.optional_list("except")?;
    let names = args.optional_map("names")?;

    let name = name.trim_matches('/');
    let (base, param) = resource_base(name);

    let selected = |action: &str| {
        (only.is_empty() || only.iter().any(|o| o == action)) && !except.iter().any(|e| e == action)
    };

    let records = RESOURCE_ACTIONS
        .iter()
        .filter(|(action, _, _)| selected(action))
        .map(|(action, verbs, suffix)| {
            let path = format!("{}{}", base, suffix.replace("param", &param));
            let mut record = EndpointRecord::new(&class.name, action, verbs.to_vec(), path);
            record.name = Some(
                names
                    .get(*action)
                    .cloned()
                    .unwrap_or_else(|| format!("{}.{}", name, action)),
            );
            record
        })
        .collect();

    Ok(records)
}
