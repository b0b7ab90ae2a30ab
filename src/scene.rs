//! Reference scene collaborator: turns interpreter callbacks into plain
//! scene data with every default filled in.

use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::compiler::interpreter::handler::{
    Arguments, Declaration, HandlerError, SceneHandler, ShapeDeclaration,
};
use crate::compiler::interpreter::value::Value;

pub type Vec3 = [f64; 3];

pub const ORIGIN: Vec3 = [0.0, 0.0, 0.0];
pub const WHITE: Vec3 = [1.0, 1.0, 1.0];

pub const SPHERE: &str = "sphere";
pub const CUBE: &str = "cube";
pub const CYLINDER: &str = "cylinder";
pub const QUAD: &str = "quad";
pub const SHAPE_TYPES: [&str; 4] = [SPHERE, CUBE, CYLINDER, QUAD];

/// Used by shapes that name no material.
pub static FALLBACK_MATERIAL: Lazy<Material> = Lazy::new(|| Material {
    name: String::from("fallback"),
    line: None,
    color: WHITE,
    specular_color: WHITE,
    roughness: 0.0,
    metalness: 0.0,
    emissive: 0.0,
    refractive: 0.0,
});

/// Indices into the owning [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneHandle {
    Group(usize),
    Material(usize),
}

impl Display for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneHandle::Group(index) => write!(f, "group#{index}"),
            SceneHandle::Material(index) => write!(f, "material#{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub line: Option<usize>,
    pub color: Vec3,
    pub specular_color: Vec3,
    pub roughness: f64,
    pub metalness: f64,
    pub emissive: f64,
    pub refractive: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub line: usize,
    pub parent: Option<usize>,
    pub position: Vec3,
    /// Euler angles, untransformed.
    pub rotation: Vec3,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        position: Vec3,
        size: f64,
    },
    Cube {
        position: Vec3,
        size: Vec3,
    },
    Cylinder {
        top_position: Vec3,
        bottom_position: Vec3,
        size: f64,
    },
    Quad {
        bottom_left: Vec3,
        bottom_right: Vec3,
        top_right: Vec3,
        top_left: Vec3,
    },
}

impl Geometry {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => SPHERE,
            Geometry::Cube { .. } => CUBE,
            Geometry::Cylinder { .. } => CYLINDER,
            Geometry::Quad { .. } => QUAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub line: usize,
    pub group: Option<usize>,
    pub geometry: Geometry,
    pub rotation: Vec3,
    pub material: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Scene {
    pub groups: Vec<Group>,
    pub materials: Vec<Material>,
    pub shapes: Vec<Shape>,
}

impl Scene {
    #[must_use]
    pub fn material_of(&self, shape: &Shape) -> &Material {
        shape
            .material
            .and_then(|index| self.materials.get(index))
            .unwrap_or(&FALLBACK_MATERIAL)
    }

    #[must_use]
    pub fn count(&self, type_name: &str) -> usize {
        self.shapes
            .iter()
            .filter(|shape| shape.geometry.type_name() == type_name)
            .count()
    }

    #[must_use]
    pub fn group_named(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    #[must_use]
    pub fn material_named(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.name == name)
    }
}

impl Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} group(s), {} material(s), {} shape(s)",
            self.groups.len(),
            self.materials.len(),
            self.shapes.len()
        )?;
        for type_name in SHAPE_TYPES {
            writeln!(f, "  {type_name}: {}", self.count(type_name))?;
        }
        Ok(())
    }
}

/// Consumes named arguments one by one; whatever is left over at the end
/// was not understood.
struct ArgumentReader {
    context: String,
    arguments: Arguments<SceneHandle>,
}

impl ArgumentReader {
    fn new(line: usize, subject: &str, arguments: Arguments<SceneHandle>) -> Result<ArgumentReader, HandlerError> {
        let reader = ArgumentReader {
            context: format!("line {}: {subject}", line + 1),
            arguments,
        };
        if !reader.arguments.positional.is_empty() {
            return Err(reader.error("positional arguments are not accepted"));
        }
        Ok(reader)
    }

    fn error(&self, message: impl Display) -> HandlerError {
        HandlerError::new(format!("{}: {message}", self.context))
    }

    fn vec3(&mut self, name: &str, default: Vec3) -> Result<Vec3, HandlerError> {
        match self.arguments.named.shift_remove(name) {
            None => Ok(default),
            Some(Value::Vector(elements)) => <Vec3>::try_from(&elements[..]).map_err(|_| {
                self.error(format!(
                    "'{name}' expects 3 components, found {}",
                    elements.len()
                ))
            }),
            Some(other) => Err(self.error(format!(
                "'{name}' expects a vector, found {}",
                other.kind_name()
            ))),
        }
    }

    fn number(&mut self, name: &str, default: f64) -> Result<f64, HandlerError> {
        match self.arguments.named.shift_remove(name) {
            None => Ok(default),
            Some(Value::Number(number)) => Ok(number),
            Some(other) => Err(self.error(format!(
                "'{name}' expects a number, found {}",
                other.kind_name()
            ))),
        }
    }

    fn material(&mut self) -> Result<Option<usize>, HandlerError> {
        match self.arguments.named.shift_remove("material") {
            None => Ok(None),
            Some(Value::Handle(SceneHandle::Material(index))) => Ok(Some(index)),
            Some(Value::Handle(SceneHandle::Group(_))) => {
                Err(self.error("'material' expects a material, found a group"))
            }
            Some(other) => Err(self.error(format!(
                "'material' expects a material, found {}",
                other.kind_name()
            ))),
        }
    }

    fn group(&self, parent: Option<&SceneHandle>) -> Result<Option<usize>, HandlerError> {
        match parent {
            None => Ok(None),
            Some(SceneHandle::Group(index)) => Ok(Some(*index)),
            Some(SceneHandle::Material(_)) => Err(self.error("parent must be a group, found a material")),
        }
    }

    fn finish(self) -> Result<(), HandlerError> {
        match self.arguments.named.keys().next() {
            Some(name) => Err(self.error(format!("unknown argument '{name}'"))),
            None => Ok(()),
        }
    }
}

/// Builds a [`Scene`] from the declarations of one document.
#[derive(Default)]
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    #[must_use]
    pub fn new() -> SceneBuilder {
        SceneBuilder::default()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

impl SceneHandler for SceneBuilder {
    type Handle = SceneHandle;

    fn shape(&mut self, declaration: ShapeDeclaration<'_, SceneHandle>) -> Result<(), HandlerError> {
        let ShapeDeclaration {
            line,
            parent,
            type_name,
            arguments,
            ..
        } = declaration;
        let mut reader = ArgumentReader::new(line, type_name, arguments)?;
        let group = reader.group(parent)?;
        let rotation = reader.vec3("rotation", ORIGIN)?;
        let material = reader.material()?;
        let geometry = match type_name {
            SPHERE => Geometry::Sphere {
                position: reader.vec3("position", ORIGIN)?,
                size: reader.number("size", 1.0)?,
            },
            CUBE => Geometry::Cube {
                position: reader.vec3("position", ORIGIN)?,
                size: reader.vec3("size", WHITE)?,
            },
            CYLINDER => Geometry::Cylinder {
                top_position: reader.vec3("topPosition", [0.0, 0.0, 1.0])?,
                bottom_position: reader.vec3("bottomPosition", [0.0, 0.0, -1.0])?,
                size: reader.number("size", 1.0)?,
            },
            QUAD => Geometry::Quad {
                bottom_left: reader.vec3("bottomLeft", [0.0, -1.0, -1.0])?,
                bottom_right: reader.vec3("bottomRight", [0.0, -1.0, 1.0])?,
                top_right: reader.vec3("topRight", [0.0, 1.0, 1.0])?,
                top_left: reader.vec3("topLeft", [0.0, 1.0, -1.0])?,
            },
            _ => return Err(reader.error(format!("unknown shape type '{type_name}'"))),
        };
        reader.finish()?;
        debug!(line, type_name, "shape added");
        self.scene.shapes.push(Shape {
            line,
            group,
            geometry,
            rotation,
            material,
        });
        Ok(())
    }

    fn group(&mut self, declaration: Declaration<'_, SceneHandle>) -> Result<SceneHandle, HandlerError> {
        let Declaration {
            line,
            parent,
            name,
            arguments,
        } = declaration;
        let mut reader = ArgumentReader::new(line, name, arguments)?;
        let group = Group {
            name: name.to_string(),
            line,
            parent: reader.group(parent)?,
            position: reader.vec3("position", ORIGIN)?,
            rotation: reader.vec3("rotation", ORIGIN)?,
            material: reader.material()?,
        };
        reader.finish()?;
        debug!(line, name, "group added");
        self.scene.groups.push(group);
        Ok(SceneHandle::Group(self.scene.groups.len() - 1))
    }

    fn material(&mut self, declaration: Declaration<'_, SceneHandle>) -> Result<SceneHandle, HandlerError> {
        let Declaration {
            line,
            parent,
            name,
            arguments,
        } = declaration;
        let mut reader = ArgumentReader::new(line, name, arguments)?;
        reader.group(parent)?;
        let fallback = &*FALLBACK_MATERIAL;
        let material = Material {
            name: name.to_string(),
            line: Some(line),
            color: reader.vec3("color", fallback.color)?,
            specular_color: reader.vec3("specularColor", fallback.specular_color)?,
            roughness: reader.number("roughness", fallback.roughness)?,
            metalness: reader.number("metalness", fallback.metalness)?,
            emissive: reader.number("emissive", fallback.emissive)?,
            refractive: reader.number("refractive", fallback.refractive)?,
        };
        reader.finish()?;
        debug!(line, name, "material added");
        self.scene.materials.push(material);
        Ok(SceneHandle::Material(self.scene.materials.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::compiler::err::{CompileError, CompileResult};
    use crate::compiler::interpreter::Interpreter;
    use crate::compiler::syntax::parser::Parser;

    fn build(code: &str) -> CompileResult<Scene> {
        let file = Parser::new(code).parse_file()?;
        let mut interpreter = Interpreter::new(SceneBuilder::new());
        interpreter.interpret(&file)?;
        Ok(interpreter.into_handler().into_scene())
    }

    fn handler_message(code: &str) -> String {
        match build(code) {
            Err(CompileError::Handler(error)) => error.message,
            Err(other) => panic!("expected a handler error, got {other}"),
            Ok(_) => panic!("expected a handler error"),
        }
    }

    #[test]
    fn test_defaults() {
        let scene = build("sphere()\ncube()\ncylinder()\nquad()").unwrap();
        assert_eq!(
            scene.shapes[0].geometry,
            Geometry::Sphere {
                position: ORIGIN,
                size: 1.0
            }
        );
        assert_eq!(
            scene.shapes[1].geometry,
            Geometry::Cube {
                position: ORIGIN,
                size: WHITE
            }
        );
        assert_eq!(
            scene.shapes[2].geometry,
            Geometry::Cylinder {
                top_position: [0.0, 0.0, 1.0],
                bottom_position: [0.0, 0.0, -1.0],
                size: 1.0
            }
        );
        assert_eq!(scene.count(QUAD), 1);
        assert_eq!(scene.material_of(&scene.shapes[0]), &*FALLBACK_MATERIAL);
    }

    #[test]
    fn test_materials_and_groups() {
        let code = indoc! {"
            $material Glass(color=(0.9, 0.9, 1), refractive=1.5)
            $group World(position=(0, 1, 0))
            $group World:Room(rotation=(0, deg2rad(90), 0), material=Glass)
            World:Room:sphere(size=0.5, material=Glass)
        "};
        let scene = build(code).unwrap();
        let glass = scene.material_named("Glass").unwrap();
        assert_eq!(glass.color, [0.9, 0.9, 1.0]);
        assert_eq!(glass.specular_color, WHITE);
        assert!((glass.refractive - 1.5).abs() < f64::EPSILON);

        let room = scene.group_named("Room").unwrap();
        assert_eq!(room.parent, Some(0));
        assert_eq!(room.material, Some(0));

        let sphere = &scene.shapes[0];
        assert_eq!(sphere.group, Some(1));
        assert_eq!(sphere.line, 3);
        assert_eq!(scene.material_of(sphere).name, "Glass");
    }

    #[test]
    fn test_unknown_shape_type() {
        assert_eq!(
            handler_message("\ncone(size=1)"),
            "line 2: cone: unknown shape type 'cone'"
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            handler_message("cube(size=(1, 2))"),
            "line 1: cube: 'size' expects 3 components, found 2"
        );
        assert_eq!(
            handler_message("sphere(size=(1, 2, 3))"),
            "line 1: sphere: 'size' expects a number, found vector"
        );
    }

    #[test]
    fn test_quad_rejects_size() {
        assert_eq!(
            handler_message("quad(size=1)"),
            "line 1: quad: unknown argument 'size'"
        );
    }

    #[test]
    fn test_positional_rejected() {
        assert_eq!(
            handler_message("sphere(1)"),
            "line 1: sphere: positional arguments are not accepted"
        );
    }

    #[test]
    fn test_handle_kinds() {
        assert_eq!(
            handler_message("$group World()\nsphere(material=World)"),
            "line 2: sphere: 'material' expects a material, found a group"
        );
        assert_eq!(
            handler_message("$material Red()\nRed:sphere()"),
            "line 2: sphere: parent must be a group, found a material"
        );
    }

    #[test]
    fn test_summary() {
        let scene = build("$material Red()\nsphere(material=Red)\nsphere()").unwrap();
        assert_eq!(
            scene.to_string(),
            "0 group(s), 1 material(s), 2 shape(s)\n  sphere: 2\n  cube: 0\n  cylinder: 0\n  quad: 0\n"
        );
    }
}
