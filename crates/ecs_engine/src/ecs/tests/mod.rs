//! Cross-module ECS tests
