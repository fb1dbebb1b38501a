use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене (неизменен после создания)
pub type ObjectId = String;

/// Форма профиля для выдавливания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtrudeShape {
    #[default]
    Rect,
    Circle,
}

/// Тип примитива с параметрами
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Primitive {
    Cube {
        size: f64,
    },
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
    },
    Extrude {
        #[serde(default)]
        shape: ExtrudeShape,
        w: f64,
        h: f64,
        depth: f64,
    },
}

impl Primitive {
    /// Тип узла для дерева сцены
    pub fn node_type(&self) -> NodeType {
        match self {
            Primitive::Cube { .. } => NodeType::Cube,
            Primitive::Sphere { .. } => NodeType::Sphere,
            Primitive::Cylinder { .. } => NodeType::Cylinder,
            Primitive::Extrude { .. } => NodeType::Extrude,
        }
    }
}

/// Трансформация объекта: позиция, вращение (радианы, порядок XYZ), масштаб.
///
/// Равенство — точное покомпонентное сравнение, без допуска.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn from_position(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Узел документа — примитив с параметрами, стабильным id и необязательной трансформацией
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub primitive: Primitive,
    /// Стабильный идентификатор (единственный ключ связи с живой сценой)
    #[serde(rename = "uuid")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl Node {
    pub fn new(id: impl Into<ObjectId>, primitive: Primitive) -> Self {
        Self {
            primitive,
            id: id.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Файл документа — упорядоченный список узлов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DocumentFile {
    pub nodes: Vec<Node>,
}

// ============================================================================
// Дерево сцены (только для отображения)
// ============================================================================

/// Тип узла в дереве сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Cube,
    Sphere,
    Cylinder,
    Extrude,
    Other,
}

impl NodeType {
    /// Базовое имя для автоматической нумерации («Cube 1»)
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Cube => "Cube",
            NodeType::Sphere => "Sphere",
            NodeType::Cylinder => "Cylinder",
            NodeType::Extrude => "Extrude",
            NodeType::Other => "Object",
        }
    }
}

/// Проекция живой сцены для панелей; пересобирается на каждом проходе синхронизации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraphNode {
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub visible: bool,
    /// Запрет на манипулятор трансформации
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneGraphNode>,
}

/// Сохраняемое состояние узла дерева (переживает пересборку сцены)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTreeItem {
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub order: usize,
}
